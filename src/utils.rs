use std::{path::Path, str::FromStr};

pub use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use solana_client::rpc_client::RpcClient;
use solana_program::program_pack::{IsInitialized, Pack};
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use spl_token::state::{Account, Mint};

use crate::config::data::Cluster;

/// Hash for devnet cluster
pub const DEVNET_HASH: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";

/// Hash for mainnet-beta cluster
pub const MAINNET_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";

/// Return the environment of the current connected RPC.
pub fn get_cluster(rpc_client: &RpcClient) -> Result<Cluster> {
    let devnet_hash = Hash::from_str(DEVNET_HASH).unwrap();
    let mainnet_hash = Hash::from_str(MAINNET_HASH).unwrap();
    let genesis_hash = rpc_client.get_genesis_hash()?;

    if genesis_hash == devnet_hash {
        Ok(Cluster::Devnet)
    } else if genesis_hash == mainnet_hash {
        Ok(Cluster::Mainnet)
    } else {
        Err(anyhow!(
            "Genesis hash '{}' doesn't match supported Solana clusters for Candy Machine",
            genesis_hash
        ))
    }
}

/// Explorer link for a minted item or program account.
pub fn solscan_url(address: &str, cluster: &Cluster) -> String {
    match cluster {
        Cluster::Mainnet => format!("https://solscan.io/address/{address}"),
        Cluster::Devnet => format!("https://solscan.io/address/{address}?cluster=devnet"),
    }
}

/// Check that the mint token is a valid address.
pub fn check_spl_token(rpc_client: &RpcClient, input: &str) -> Result<Mint> {
    let pubkey = Pubkey::from_str(input)?;
    let token_data = rpc_client.get_account_data(&pubkey)?;
    if token_data.len() != Mint::LEN {
        return Err(anyhow!("Invalid spl-token passed in."));
    }
    let token_mint = Mint::unpack_from_slice(&token_data)?;

    if token_mint.is_initialized {
        Ok(token_mint)
    } else {
        Err(anyhow!(
            "The specified spl-token is not initialized: {}",
            input
        ))
    }
}

/// Check that the mint token account is a valid account.
pub fn check_spl_token_account(rpc_client: &RpcClient, input: &str) -> Result<()> {
    let pubkey = Pubkey::from_str(input)?;
    let ata_data = rpc_client.get_account_data(&pubkey)?;
    let ata_account = Account::unpack_unchecked(&ata_data)?;

    if IsInitialized::is_initialized(&ata_account) {
        Ok(())
    } else {
        Err(anyhow!(
            "The specified spl-token account is not initialized: {}",
            input
        ))
    }
}

pub fn path_to_string(path: &Path) -> Result<String> {
    match path.to_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(anyhow!("Couldn't convert path to string.")),
    }
}

pub fn spinner_with_style() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(120);
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "▹▹▹▹▹",
                "▸▹▹▹▹",
                "▹▸▹▹▹",
                "▹▹▸▹▹",
                "▹▹▹▸▹",
                "▹▹▹▹▸",
                "▪▪▪▪▪",
            ])
            .template("{spinner:.dim} {msg}"),
    );
    pb
}
