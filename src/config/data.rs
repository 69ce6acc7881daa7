use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Keypair};

use crate::config::errors::ConfigError;
use crate::config::guard_data::CandyGuardData;
use crate::config::{to_pubkey, to_string};

pub struct SetupConfig {
    pub keypair: Keypair,
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SolanaConfig {
    pub json_rpc_url: String,
    pub keypair_path: String,
    pub commitment: String,
}

/// Provisioning configuration for a drop: supply, collection metadata and
/// the guard groups to install.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigData {
    pub number: u64,

    pub symbol: String,

    pub seller_fee_basis_points: u16,

    pub is_mutable: bool,

    pub creators: Vec<Creator>,

    pub collection: CollectionConfig,

    pub guards: Option<CandyGuardData>,

    /// Plain address lists used to derive allow-list merkle roots for the
    /// groups that name them.
    pub allow_lists: Option<Vec<AllowListData>>,
}

impl ConfigData {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let share: u16 = self.creators.iter().map(|c| c.share as u16).sum();
        if !self.creators.is_empty() && share != 100 {
            return Err(ConfigError::InvalidCreatorShare(share));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Creator {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub address: Pubkey,

    pub share: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CollectionConfig {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AllowListData {
    pub label: String,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    Devnet,
    Mainnet,
}

impl FromStr for Cluster {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            _ => Err(ConfigError::InvalidCluster(s.to_string())),
        }
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Mainnet => write!(f, "mainnet"),
        }
    }
}

pub fn price_as_lamports(price: f64) -> u64 {
    (price * LAMPORTS_PER_SOL as f64) as u64
}
