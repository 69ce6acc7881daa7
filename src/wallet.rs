use anyhow::Result;
use serde::{Deserialize, Serialize};
use solana_client::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;

use crate::config::{to_pubkey, to_string};

/// Live wallet and chain state an eligibility check runs against. A context
/// is a snapshot rebuilt from authoritative reads; the evaluator never
/// mutates it and the client never treats it as a source of truth for
/// balances or limits.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletContext {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub payer: Pubkey,

    pub lamports: u64,

    pub tokens: Vec<TokenHolding>,

    pub nfts: Vec<OwnedNft>,

    /// Mints already redeemed by this wallet, per mint-limit id.
    pub mint_counters: Vec<MintCounter>,

    /// Machine-wide redeemed count, when known. Absent data leaves the
    /// redeemed-amount guard unbounded.
    pub items_redeemed: Option<u64>,

    /// Merkle proof of allow-list membership, attached by the host after it
    /// derives one for the active group.
    #[serde(skip)]
    pub allow_list_proof: Option<Vec<[u8; 32]>>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub mint: Pubkey,

    pub amount: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedNft {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub mint: Pubkey,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub collection: Pubkey,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintCounter {
    pub id: u8,
    pub count: u32,
}

impl WalletContext {
    pub fn new(payer: Pubkey) -> Self {
        WalletContext {
            payer,
            ..Default::default()
        }
    }

    pub fn token_balance(&self, mint: &Pubkey) -> u64 {
        self.tokens
            .iter()
            .filter(|t| t.mint == *mint)
            .map(|t| t.amount)
            .sum()
    }

    pub fn nft_count(&self, collection: &Pubkey) -> u32 {
        self.nfts.iter().filter(|n| n.collection == *collection).count() as u32
    }

    /// Owned mints usable for a guard on `collection`, in inventory order.
    pub fn nfts_in_collection(&self, collection: &Pubkey) -> Vec<Pubkey> {
        self.nfts
            .iter()
            .filter(|n| n.collection == *collection)
            .map(|n| n.mint)
            .collect()
    }

    pub fn mint_count(&self, id: u8) -> u32 {
        self.mint_counters
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Refresh the native balance from the cluster.
    pub fn fetch_balance(&mut self, rpc_client: &RpcClient) -> Result<()> {
        self.lamports = rpc_client.get_balance(&self.payer)?;
        Ok(())
    }
}
