//! Multi-currency cost summary for a guard set. Amounts are carried in base
//! units (lamports, raw token amounts) and only converted for display, so
//! per-item scaling stays exact.

use std::collections::HashMap;

use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

use super::GuardSet;
use crate::constants::MINT_FEE_LAMPORTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriceKind {
    Sol,
    Token,
    Nft,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceLine {
    pub kind: PriceKind,
    /// Token mint or required collection; `None` for the native currency.
    pub mint: Option<Pubkey>,
    /// Base units: lamports, raw token amount, or an NFT count.
    pub amount: u64,
    pub decimals: u8,
    pub label: String,
}

impl PriceLine {
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10u64.pow(self.decimals as u32) as f64
    }
}

/// Price lines bucketed by what happens to the asset. Gate lines are
/// required holdings, not transfers; they are displayed but never charged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedPrices {
    pub payment: Vec<PriceLine>,
    pub burn: Vec<PriceLine>,
    pub gate: Vec<PriceLine>,
}

impl AggregatedPrices {
    /// Estimated native cost for the whole batch: the (already scaled)
    /// native payment lines plus the flat per-mint network fee.
    pub fn total_sol_cost(&self, quantity: u32) -> u64 {
        let payment: u64 = self
            .payment
            .iter()
            .filter(|line| line.kind == PriceKind::Sol)
            .map(|line| line.amount)
            .sum();
        payment + MINT_FEE_LAMPORTS * quantity as u64
    }
}

enum Bucket {
    Payment,
    Burn,
    Gate,
}

/// Aggregate the cost of minting `quantity` items under `guards`.
///
/// Payment and burn amounts are per item and scale with the quantity; gate
/// amounts are holdings and do not. When the same asset appears in more than
/// one guard a single line is kept, in its first-seen bucket, with the
/// maximum of the competing amounts. The bot tax is a penalty, not a price,
/// and is never listed.
pub fn aggregate(guards: &GuardSet, quantity: u32) -> AggregatedPrices {
    let mut prices = AggregatedPrices::default();
    let mut seen: HashMap<(PriceKind, Option<Pubkey>), (usize, usize)> = HashMap::new();
    let quantity = quantity.max(1) as u64;

    let mut push = |prices: &mut AggregatedPrices, bucket: Bucket, line: PriceLine| {
        let key = (line.kind, line.mint);
        if let Some(&(bucket_index, line_index)) = seen.get(&key) {
            let lines = match bucket_index {
                0 => &mut prices.payment,
                1 => &mut prices.burn,
                _ => &mut prices.gate,
            };
            let kept = &mut lines[line_index];
            kept.amount = kept.amount.max(line.amount);
            return;
        }
        let (bucket_index, lines) = match bucket {
            Bucket::Payment => (0, &mut prices.payment),
            Bucket::Burn => (1, &mut prices.burn),
            Bucket::Gate => (2, &mut prices.gate),
        };
        lines.push(line);
        seen.insert(key, (bucket_index, lines.len() - 1));
    };

    if let Some(sol_payment) = &guards.sol_payment {
        push(
            &mut prices,
            Bucket::Payment,
            PriceLine {
                kind: PriceKind::Sol,
                mint: None,
                amount: sol_payment.lamports.saturating_mul(quantity),
                decimals: sol_decimals(),
                label: "SOL".to_string(),
            },
        );
    }

    if let Some(token_payment) = &guards.token_payment {
        push(
            &mut prices,
            Bucket::Payment,
            PriceLine {
                kind: PriceKind::Token,
                mint: Some(token_payment.mint),
                amount: token_payment.amount.saturating_mul(quantity),
                decimals: token_payment.decimals,
                label: token_label(&token_payment.symbol),
            },
        );
    }

    if let Some(nft_payment) = &guards.nft_payment {
        push(
            &mut prices,
            Bucket::Payment,
            PriceLine {
                kind: PriceKind::Nft,
                mint: Some(nft_payment.required_collection),
                amount: quantity,
                decimals: 0,
                label: "NFT".to_string(),
            },
        );
    }

    if let Some(token_burn) = &guards.token_burn {
        push(
            &mut prices,
            Bucket::Burn,
            PriceLine {
                kind: PriceKind::Token,
                mint: Some(token_burn.mint),
                amount: token_burn.amount.saturating_mul(quantity),
                decimals: token_burn.decimals,
                label: token_label(&token_burn.symbol),
            },
        );
    }

    if let Some(nft_burn) = &guards.nft_burn {
        push(
            &mut prices,
            Bucket::Burn,
            PriceLine {
                kind: PriceKind::Nft,
                mint: Some(nft_burn.required_collection),
                amount: quantity,
                decimals: 0,
                label: "NFT".to_string(),
            },
        );
    }

    if let Some(token_gate) = &guards.token_gate {
        push(
            &mut prices,
            Bucket::Gate,
            PriceLine {
                kind: PriceKind::Token,
                mint: Some(token_gate.mint),
                amount: token_gate.amount,
                decimals: token_gate.decimals,
                label: token_label(&token_gate.symbol),
            },
        );
    }

    if let Some(nft_gate) = &guards.nft_gate {
        push(
            &mut prices,
            Bucket::Gate,
            PriceLine {
                kind: PriceKind::Nft,
                mint: Some(nft_gate.required_collection),
                amount: 1,
                decimals: 0,
                label: "NFT".to_string(),
            },
        );
    }

    prices
}

fn sol_decimals() -> u8 {
    LAMPORTS_PER_SOL.ilog10() as u8
}

fn token_label(symbol: &Option<String>) -> String {
    symbol.clone().unwrap_or_else(|| "tokens".to_string())
}
