//! One-off drop setup: create the collection and the candy machine with its
//! guard groups, recording the created addresses in the cache file. The
//! cache is what makes a re-run update the existing accounts instead of
//! creating new ones; there is no other coordination, so concurrent runs
//! against the same cache are not safe.

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::cache::{load_cache, Cache, CacheProgram};
use crate::config::data::{CollectionConfig, ConfigData, Creator};
use crate::config::parser::get_config_data;
use crate::errors::CacheError;
use crate::guards;

/// Chain-writing half of provisioning. Implemented by the external minting
/// program's SDK; in-memory implementations drive the workflow in tests.
#[async_trait]
pub trait DeployBackend {
    async fn create_collection(
        &self,
        collection: &CollectionConfig,
        creators: &[Creator],
    ) -> Result<Pubkey>;

    async fn create_machine(
        &self,
        config: &ConfigData,
        collection_mint: &Pubkey,
        guards: &guards::CandyGuardData,
    ) -> Result<MachineAddresses>;

    async fn update_guards(
        &self,
        candy_guard: &Pubkey,
        guards: &guards::CandyGuardData,
    ) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineAddresses {
    pub candy_machine: Pubkey,
    pub candy_guard: Pubkey,
}

pub struct ProvisionArgs {
    pub config: String,
    pub cache: String,
    pub env: String,
}

pub async fn process_provision<B: DeployBackend>(
    args: ProvisionArgs,
    authority: &Pubkey,
    backend: &B,
) -> Result<Cache> {
    let config_data = get_config_data(&args.config)?;
    config_data.validate()?;

    // resolve allow-list roots before converting to the runtime format
    let guard_config = config_data.guards.clone().unwrap_or_default();
    let guard_config = match &config_data.allow_lists {
        Some(lists) => guard_config.with_allow_list_roots(lists)?,
        None => guard_config.with_allow_list_roots(&[])?,
    };
    let guard_data = guard_config.to_guard_format()?;

    let mut cache = load_cache(&args.cache, true)?;
    if cache.env.is_empty() {
        cache.env = args.env.clone();
        cache.cache_name = args.cache.clone();
    }

    let collection_mint = if cache.program.collection_mint.is_empty() {
        info!("Creating collection: {}", config_data.collection.name);
        let mint = backend
            .create_collection(&config_data.collection, &config_data.creators)
            .await?;
        cache.program.collection_mint = mint.to_string();
        mint
    } else {
        info!("Reusing collection from cache");
        Pubkey::from_str(&cache.program.collection_mint)
            .map_err(|_| CacheError::InvalidCandyMachineAddress(cache.program.collection_mint.clone()))?
    };

    if cache.program.is_provisioned() {
        let candy_guard = Pubkey::from_str(&cache.program.candy_guard)
            .map_err(|_| CacheError::InvalidCandyMachineAddress(cache.program.candy_guard.clone()))?;
        info!("Machine already provisioned, updating guards");
        backend.update_guards(&candy_guard, &guard_data).await?;
    } else {
        info!("Creating candy machine for {} item(s)", config_data.number);
        let addresses = backend
            .create_machine(&config_data, &collection_mint, &guard_data)
            .await?;
        cache.program = CacheProgram::new_from_machine(
            &addresses.candy_machine,
            &addresses.candy_guard,
            authority,
            &collection_mint,
        );
    }

    cache.write_to_file(&args.cache)?;
    info!("Provisioning record written to {}", args.cache);

    Ok(cache)
}
