pub mod allowlist;
pub mod evaluate;
pub mod prices;

use indexmap::IndexMap;
use solana_sdk::pubkey::Pubkey;

pub use evaluate::{evaluate, MintEligibility, NO_LIMIT};
pub use prices::{aggregate, AggregatedPrices, PriceKind, PriceLine};

use crate::constants::DEFAULT_GROUP_LABEL;
use crate::wallet::WalletContext;

/// Runtime guard configuration: a default set plus labeled overrides,
/// mirroring the on-chain account layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandyGuardData {
    pub default: GuardSet,
    pub groups: Vec<Group>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub label: String,
    pub guards: GuardSet,
}

impl CandyGuardData {
    /// Effective rule set for a group label. A guard kind present in the
    /// named group replaces the default's version of that kind; absent kinds
    /// fall back to the default. An unknown or missing label resolves to the
    /// default set alone, and an empty configuration resolves to an empty
    /// set: no guards active, unrestricted mint.
    pub fn resolve(&self, label: Option<&str>) -> GuardSet {
        match label
            .filter(|l| *l != DEFAULT_GROUP_LABEL)
            .and_then(|l| self.groups.iter().find(|g| g.label == l))
        {
            Some(group) => self.default.merge(&group.guards),
            None => self.default.clone(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }
}

macro_rules! merge_guards {
    ($default:expr, $group:expr, { $($field:ident),+ $(,)? }) => {
        GuardSet {
            $($field: $group.$field.clone().or_else(|| $default.$field.clone()),)+
        }
    };
}

/// The set of guards that can be active for a mint attempt.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuardSet {
    pub bot_tax: Option<BotTax>,
    pub sol_payment: Option<SolPayment>,
    pub token_payment: Option<TokenPayment>,
    pub start_date: Option<StartDate>,
    pub token_gate: Option<TokenGate>,
    pub gatekeeper: Option<Gatekeeper>,
    pub end_date: Option<EndDate>,
    pub allow_list: Option<AllowList>,
    pub mint_limit: Option<MintLimit>,
    pub nft_payment: Option<NftPayment>,
    pub redeemed_amount: Option<RedeemedAmount>,
    pub address_gate: Option<AddressGate>,
    pub nft_gate: Option<NftGate>,
    pub nft_burn: Option<NftBurn>,
    pub token_burn: Option<TokenBurn>,
}

impl GuardSet {
    /// Override-by-presence merge of a group's guards over this set.
    pub fn merge(&self, group: &GuardSet) -> GuardSet {
        merge_guards!(self, group, {
            bot_tax,
            sol_payment,
            token_payment,
            start_date,
            token_gate,
            gatekeeper,
            end_date,
            allow_list,
            mint_limit,
            nft_payment,
            redeemed_amount,
            address_gate,
            nft_gate,
            nft_burn,
            token_burn,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == GuardSet::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotTax {
    pub lamports: u64,
    pub last_instruction: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolPayment {
    pub lamports: u64,
    pub destination: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPayment {
    pub amount: u64,
    pub mint: Pubkey,
    pub destination_ata: Pubkey,
    pub decimals: u8,
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartDate {
    pub date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndDate {
    pub date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGate {
    pub amount: u64,
    pub mint: Pubkey,
    pub decimals: u8,
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBurn {
    pub amount: u64,
    pub mint: Pubkey,
    pub decimals: u8,
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gatekeeper {
    pub gatekeeper_network: Pubkey,
    pub expire_on_use: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    pub merkle_root: [u8; 32],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintLimit {
    /// Unique identifier of the mint limit.
    pub id: u8,
    /// Limit of mints per individual address.
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftPayment {
    pub required_collection: Pubkey,
    pub destination: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftGate {
    pub required_collection: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftBurn {
    pub required_collection: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedeemedAmount {
    pub maximum: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressGate {
    pub address: Pubkey,
}

/// Everything the UI needs for one guard group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSnapshot {
    pub guards: GuardSet,
    pub eligibility: MintEligibility,
    pub prices: AggregatedPrices,
}

/// Recompute verdicts and prices for the default set and every group.
/// Invoked by the host whenever the wallet context changes; there is no
/// hidden dependency tracking.
pub fn recompute(
    data: &CandyGuardData,
    ctx: &WalletContext,
    now: i64,
    quantity: u32,
) -> IndexMap<String, GroupSnapshot> {
    let mut snapshots = IndexMap::with_capacity(data.groups.len() + 1);

    let mut insert = |label: &str, guards: GuardSet| {
        let eligibility = evaluate(&guards, ctx, now);
        let prices = aggregate(&guards, quantity);
        snapshots.insert(
            label.to_string(),
            GroupSnapshot {
                guards,
                eligibility,
                prices,
            },
        );
    };

    insert(DEFAULT_GROUP_LABEL, data.default.clone());
    for group in &data.groups {
        insert(&group.label, data.resolve(Some(&group.label)));
    }

    snapshots
}
