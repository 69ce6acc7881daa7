use std::{env, fs::File, path::Path};

use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, signature::read_keypair_file};

use crate::config::data::{SetupConfig, SolanaConfig};
use crate::errors::SetupError;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Resolve keypair and RPC url from the command line, falling back to the
/// Solana CLI config and finally to `~/.config/solana/id.json` / devnet.
pub fn fondant_setup(
    keypair_opt: Option<String>,
    rpc_url_opt: Option<String>,
) -> Result<SetupConfig> {
    let sol_config = parse_solana_config();

    let rpc_url = match rpc_url_opt {
        Some(rpc_url) => rpc_url,
        None => match sol_config {
            Some(ref sol_config) => sol_config.json_rpc_url.clone(),
            None => DEFAULT_RPC_URL.to_string(),
        },
    };

    let keypair_path = match keypair_opt {
        Some(path) => path,
        None => match sol_config {
            Some(ref sol_config) => sol_config.keypair_path.clone(),
            None => shellexpand::tilde("~/.config/solana/id.json").into_owned(),
        },
    };

    let keypair = read_keypair_file(&keypair_path)
        .map_err(|err| SetupError::SetupError(format!("{keypair_path}: {err}")))?;

    Ok(SetupConfig { keypair, rpc_url })
}

pub fn setup_rpc_client(config: &SetupConfig) -> RpcClient {
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

/// Read the Solana CLI config file, if there is one.
pub fn parse_solana_config() -> Option<SolanaConfig> {
    let home = if cfg!(windows) {
        let drive = env::var_os("HOMEDRIVE")?;
        let path = env::var_os("HOMEPATH")?;
        Path::new(&drive).join(&path).into_os_string()
    } else {
        env::var_os("HOME")?
    };

    let config_path = Path::new(&home)
        .join(".config")
        .join("solana")
        .join("cli")
        .join("config.yml");

    let conf_file = match File::open(config_path) {
        Ok(f) => f,
        Err(_) => return None,
    };
    serde_yaml::from_reader(&conf_file).ok()
}
