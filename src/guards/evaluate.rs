//! Client-side mirror of the checks the guard program enforces on chain.
//! The verdict is advisory: the program remains the authority, this exists
//! so the UI can block, label and price the mint button without a
//! round-trip.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use super::allowlist;
use super::GuardSet;
use crate::wallet::WalletContext;

/// Sentinel for "no ceiling applies".
pub const NO_LIMIT: u32 = u32::MAX;

pub const MSG_NOT_STARTED: &str = "Mint has not started yet";
pub const MSG_ENDED: &str = "Mint has ended";
pub const MSG_LIMIT_REACHED: &str = "Mint limit for this wallet reached";
pub const MSG_FULLY_REDEEMED: &str = "All items for this group have been redeemed";
pub const MSG_ADDRESS_GATE: &str = "This mint is restricted to a different address";
pub const MSG_NOT_WHITELISTED: &str = "Wallet is not on the allow list";
pub const MSG_NOT_ENOUGH_SOL: &str = "Not enough SOL to mint";
pub const MSG_NOT_ENOUGH_TOKENS: &str = "Not enough tokens to pay for the mint";
pub const MSG_NOT_ENOUGH_TOKENS_TO_BURN: &str = "Not enough tokens to burn";
pub const MSG_MISSING_TOKEN_GATE: &str = "Missing the token required to mint";
pub const MSG_MISSING_NFT_PAYMENT: &str = "No NFT from the required collection to pay with";
pub const MSG_MISSING_NFT_BURN: &str = "No NFT from the required collection to burn";
pub const MSG_MISSING_NFT_GATE: &str = "No NFT from the required collection in this wallet";

/// Structured verdict for one effective rule set. Derived fresh on every
/// evaluation, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintEligibility {
    pub is_started: bool,
    pub is_ended: bool,
    pub is_limit_reached: bool,
    pub is_wallet_whitelisted: bool,
    pub has_gatekeeper: bool,
    /// How many more items this wallet may mint: the minimum of the
    /// per-wallet remainder, the global remainder and any ceiling implied by
    /// finite NFT inventories. [`NO_LIMIT`] when nothing constrains it.
    pub can_pay_for: u32,
    /// Every blocking reason at once, in guard order. The UI shows them all.
    pub messages: Vec<String>,
}

impl Default for MintEligibility {
    fn default() -> Self {
        MintEligibility {
            is_started: true,
            is_ended: false,
            is_limit_reached: false,
            is_wallet_whitelisted: true,
            has_gatekeeper: false,
            can_pay_for: NO_LIMIT,
            messages: Vec::new(),
        }
    }
}

impl MintEligibility {
    pub fn is_mintable(&self) -> bool {
        self.messages.is_empty() && self.can_pay_for > 0
    }
}

/// Evaluate an effective rule set against wallet state at `now` (unix
/// seconds). Pure: identical inputs yield an identical verdict. Checks never
/// short-circuit; every failing guard contributes its message.
pub fn evaluate(guards: &GuardSet, ctx: &WalletContext, now: i64) -> MintEligibility {
    let mut verdict = MintEligibility {
        has_gatekeeper: guards.gatekeeper.is_some(),
        ..Default::default()
    };

    if let Some(start_date) = &guards.start_date {
        if now < start_date.date {
            verdict.is_started = false;
            verdict.messages.push(MSG_NOT_STARTED.to_string());
        }
    }

    if let Some(end_date) = &guards.end_date {
        if now >= end_date.date {
            verdict.is_ended = true;
            verdict.messages.push(MSG_ENDED.to_string());
        }
    }

    if let Some(mint_limit) = &guards.mint_limit {
        let remaining = mint_limit.limit.saturating_sub(ctx.mint_count(mint_limit.id));
        if remaining == 0 {
            verdict.is_limit_reached = true;
            verdict.messages.push(MSG_LIMIT_REACHED.to_string());
        }
        verdict.can_pay_for = verdict.can_pay_for.min(remaining);
    }

    if let Some(redeemed_amount) = &guards.redeemed_amount {
        if let Some(redeemed) = ctx.items_redeemed {
            let remaining = redeemed_amount.maximum.saturating_sub(redeemed);
            if remaining == 0 {
                verdict.messages.push(MSG_FULLY_REDEEMED.to_string());
            }
            verdict.can_pay_for = verdict.can_pay_for.min(remaining.min(NO_LIMIT as u64) as u32);
        }
    }

    if let Some(address_gate) = &guards.address_gate {
        if ctx.payer != address_gate.address {
            verdict.messages.push(MSG_ADDRESS_GATE.to_string());
            verdict.can_pay_for = 0;
        }
    }

    if let Some(allow_list) = &guards.allow_list {
        let proven = ctx
            .allow_list_proof
            .as_ref()
            .map(|proof| allowlist::verify(proof, &allow_list.merkle_root, &ctx.payer.to_bytes()))
            .unwrap_or(false);
        if !proven {
            verdict.is_wallet_whitelisted = false;
            verdict.messages.push(MSG_NOT_WHITELISTED.to_string());
        }
    }

    if let Some(sol_payment) = &guards.sol_payment {
        if ctx.lamports < sol_payment.lamports {
            verdict.messages.push(MSG_NOT_ENOUGH_SOL.to_string());
        }
    }

    if let Some(token_payment) = &guards.token_payment {
        if ctx.token_balance(&token_payment.mint) < token_payment.amount {
            verdict.messages.push(MSG_NOT_ENOUGH_TOKENS.to_string());
        }
    }

    if let Some(token_burn) = &guards.token_burn {
        if ctx.token_balance(&token_burn.mint) < token_burn.amount {
            verdict
                .messages
                .push(MSG_NOT_ENOUGH_TOKENS_TO_BURN.to_string());
        }
    }

    if let Some(token_gate) = &guards.token_gate {
        if ctx.token_balance(&token_gate.mint) < token_gate.amount {
            verdict.messages.push(MSG_MISSING_TOKEN_GATE.to_string());
        }
    }

    // Each NFT guard needs a distinct owned instance per unit, so a
    // collection referenced by several guards divides the inventory.
    let mut demand: HashMap<Pubkey, u32> = HashMap::new();
    let mut nft_check = |collection: &Pubkey, message: &str, verdict: &mut MintEligibility| {
        if ctx.nft_count(collection) == 0 {
            verdict.messages.push(message.to_string());
        }
        *demand.entry(*collection).or_insert(0) += 1;
    };

    if let Some(nft_payment) = &guards.nft_payment {
        nft_check(
            &nft_payment.required_collection,
            MSG_MISSING_NFT_PAYMENT,
            &mut verdict,
        );
    }
    if let Some(nft_burn) = &guards.nft_burn {
        nft_check(
            &nft_burn.required_collection,
            MSG_MISSING_NFT_BURN,
            &mut verdict,
        );
    }
    if let Some(nft_gate) = &guards.nft_gate {
        nft_check(
            &nft_gate.required_collection,
            MSG_MISSING_NFT_GATE,
            &mut verdict,
        );
    }

    for (collection, per_unit) in demand {
        let ceiling = ctx.nft_count(&collection) / per_unit;
        verdict.can_pay_for = verdict.can_pay_for.min(ceiling);
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::*;
    use crate::wallet::{MintCounter, OwnedNft, TokenHolding};

    const NOW: i64 = 1_700_000_000;

    fn wallet() -> WalletContext {
        WalletContext::new(Pubkey::new_unique())
    }

    #[test]
    fn no_guards_means_unrestricted() {
        let verdict = evaluate(&GuardSet::default(), &wallet(), NOW);

        assert!(verdict.is_started);
        assert!(!verdict.is_ended);
        assert_eq!(verdict.can_pay_for, NO_LIMIT);
        assert!(verdict.messages.is_empty());
        assert!(verdict.is_mintable());
    }

    #[test]
    fn start_date_boundary_is_inclusive() {
        let at_now = GuardSet {
            start_date: Some(StartDate { date: NOW }),
            ..Default::default()
        };
        assert!(evaluate(&at_now, &wallet(), NOW).is_started);

        let one_second_out = GuardSet {
            start_date: Some(StartDate { date: NOW + 1 }),
            ..Default::default()
        };
        let verdict = evaluate(&one_second_out, &wallet(), NOW);
        assert!(!verdict.is_started);
        assert_eq!(verdict.messages, vec![MSG_NOT_STARTED.to_string()]);
    }

    #[test]
    fn end_date_boundary_blocks_at_now() {
        let guards = GuardSet {
            end_date: Some(EndDate { date: NOW }),
            ..Default::default()
        };
        let verdict = evaluate(&guards, &wallet(), NOW);

        assert!(verdict.is_ended);
        assert!(!verdict.is_mintable());
    }

    #[test]
    fn mint_limit_boundary() {
        let guards = GuardSet {
            mint_limit: Some(MintLimit { id: 1, limit: 5 }),
            ..Default::default()
        };

        let mut ctx = wallet();
        ctx.mint_counters = vec![MintCounter { id: 1, count: 5 }];
        let verdict = evaluate(&guards, &ctx, NOW);
        assert!(verdict.is_limit_reached);
        assert_eq!(verdict.can_pay_for, 0);

        ctx.mint_counters = vec![MintCounter { id: 1, count: 4 }];
        let verdict = evaluate(&guards, &ctx, NOW);
        assert!(!verdict.is_limit_reached);
        assert_eq!(verdict.can_pay_for, 1);
    }

    #[test]
    fn redeemed_amount_caps_and_defaults_to_unbounded() {
        let guards = GuardSet {
            redeemed_amount: Some(RedeemedAmount { maximum: 100 }),
            ..Default::default()
        };

        let mut ctx = wallet();
        ctx.items_redeemed = Some(97);
        assert_eq!(evaluate(&guards, &ctx, NOW).can_pay_for, 3);

        ctx.items_redeemed = None;
        assert_eq!(evaluate(&guards, &ctx, NOW).can_pay_for, NO_LIMIT);
    }

    #[test]
    fn address_gate_blocks_other_wallets() {
        let owner = Pubkey::new_unique();
        let guards = GuardSet {
            address_gate: Some(AddressGate { address: owner }),
            ..Default::default()
        };

        let verdict = evaluate(&guards, &wallet(), NOW);
        assert_eq!(verdict.can_pay_for, 0);
        assert_eq!(verdict.messages, vec![MSG_ADDRESS_GATE.to_string()]);
        assert!(!verdict.is_mintable());

        let verdict = evaluate(&guards, &WalletContext::new(owner), NOW);
        assert!(verdict.is_mintable());
    }

    #[test]
    fn allow_list_membership_is_proved_not_assumed() {
        let member = Pubkey::new_unique();
        let leaves: Vec<[u8; 32]> = vec![member.to_bytes(), Pubkey::new_unique().to_bytes()];
        let guards = GuardSet {
            allow_list: Some(AllowList {
                merkle_root: allowlist::merkle_root(&leaves),
            }),
            ..Default::default()
        };

        // no proof attached
        let verdict = evaluate(&guards, &WalletContext::new(member), NOW);
        assert!(!verdict.is_wallet_whitelisted);
        assert!(!verdict.is_mintable());

        let mut ctx = WalletContext::new(member);
        ctx.allow_list_proof = allowlist::merkle_proof(&leaves, &member.to_bytes());
        let verdict = evaluate(&guards, &ctx, NOW);
        assert!(verdict.is_wallet_whitelisted);
        assert!(verdict.is_mintable());
    }

    #[test]
    fn payment_checks_collect_every_message() {
        let mint = Pubkey::new_unique();
        let guards = GuardSet {
            sol_payment: Some(SolPayment {
                lamports: 690_000_000,
                destination: Pubkey::new_unique(),
            }),
            token_payment: Some(TokenPayment {
                amount: 10,
                mint,
                destination_ata: Pubkey::new_unique(),
                decimals: 0,
                symbol: None,
            }),
            token_gate: Some(TokenGate {
                amount: 1,
                mint: Pubkey::new_unique(),
                decimals: 0,
                symbol: None,
            }),
            ..Default::default()
        };

        let verdict = evaluate(&guards, &wallet(), NOW);
        assert_eq!(
            verdict.messages,
            vec![
                MSG_NOT_ENOUGH_SOL.to_string(),
                MSG_NOT_ENOUGH_TOKENS.to_string(),
                MSG_MISSING_TOKEN_GATE.to_string(),
            ]
        );
    }

    #[test]
    fn token_balances_satisfy_payment_guards() {
        let mint = Pubkey::new_unique();
        let guards = GuardSet {
            token_payment: Some(TokenPayment {
                amount: 9_000_000,
                mint,
                destination_ata: Pubkey::new_unique(),
                decimals: 5,
                symbol: Some("BONK".to_string()),
            }),
            ..Default::default()
        };

        let mut ctx = wallet();
        ctx.tokens = vec![TokenHolding {
            mint,
            amount: 9_000_000,
        }];
        assert!(evaluate(&guards, &ctx, NOW).is_mintable());
    }

    #[test]
    fn nft_inventory_bounds_can_pay_for() {
        let collection = Pubkey::new_unique();
        let guards = GuardSet {
            nft_payment: Some(NftPayment {
                required_collection: collection,
                destination: Pubkey::new_unique(),
            }),
            nft_burn: Some(NftBurn {
                required_collection: collection,
            }),
            ..Default::default()
        };

        let mut ctx = wallet();
        ctx.nfts = (0..5)
            .map(|_| OwnedNft {
                mint: Pubkey::new_unique(),
                collection,
            })
            .collect();

        // payment and burn each consume one instance per unit
        let verdict = evaluate(&guards, &ctx, NOW);
        assert_eq!(verdict.can_pay_for, 2);
        assert!(verdict.is_mintable());
    }

    #[test]
    fn empty_nft_inventory_blocks_with_message() {
        let guards = GuardSet {
            nft_gate: Some(NftGate {
                required_collection: Pubkey::new_unique(),
            }),
            ..Default::default()
        };

        let verdict = evaluate(&guards, &wallet(), NOW);
        assert_eq!(verdict.can_pay_for, 0);
        assert_eq!(verdict.messages, vec![MSG_MISSING_NFT_GATE.to_string()]);
    }

    #[test]
    fn gatekeeper_signals_without_blocking() {
        let guards = GuardSet {
            gatekeeper: Some(Gatekeeper {
                gatekeeper_network: Pubkey::new_unique(),
                expire_on_use: false,
            }),
            ..Default::default()
        };

        let verdict = evaluate(&guards, &wallet(), NOW);
        assert!(verdict.has_gatekeeper);
        assert!(verdict.is_mintable());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mint = Pubkey::new_unique();
        let guards = GuardSet {
            start_date: Some(StartDate { date: NOW - 60 }),
            mint_limit: Some(MintLimit { id: 7, limit: 3 }),
            token_payment: Some(TokenPayment {
                amount: 5,
                mint,
                destination_ata: Pubkey::new_unique(),
                decimals: 0,
                symbol: None,
            }),
            ..Default::default()
        };

        let mut ctx = wallet();
        ctx.tokens = vec![TokenHolding { mint, amount: 3 }];
        ctx.mint_counters = vec![MintCounter { id: 7, count: 1 }];

        let first = evaluate(&guards, &ctx, NOW);
        for _ in 0..100 {
            assert_eq!(evaluate(&guards, &ctx, NOW), first);
        }
    }
}
