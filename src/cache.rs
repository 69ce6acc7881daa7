use std::{fs, io::Write, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{error, info};

use crate::errors::CacheError;
use crate::utils::path_to_string;

/// Provisioning record. The cache file is the only thing that makes a
/// re-run update the existing machine instead of creating a new one.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Cache {
    pub program: CacheProgram,
    pub env: String,
    #[serde(rename = "cacheName")]
    pub cache_name: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheProgram {
    pub candy_machine: String,
    pub candy_guard: String,
    pub candy_machine_creator: String,
    pub collection_mint: String,
}

impl CacheProgram {
    pub fn new_from_machine(
        candy_machine: &Pubkey,
        candy_guard: &Pubkey,
        creator: &Pubkey,
        collection_mint: &Pubkey,
    ) -> Self {
        CacheProgram {
            candy_machine: candy_machine.to_string(),
            candy_guard: candy_guard.to_string(),
            candy_machine_creator: creator.to_string(),
            collection_mint: collection_mint.to_string(),
        }
    }

    pub fn is_provisioned(&self) -> bool {
        !self.candy_machine.is_empty()
    }
}

impl Cache {
    pub fn new(env: &str, cache_name: &str) -> Self {
        Cache {
            program: CacheProgram::default(),
            env: env.to_string(),
            cache_name: cache_name.to_string(),
        }
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut f = fs::File::create(path)?;
        let c = serde_json::to_string_pretty(&self)?;
        f.write_all(c.as_bytes())?;

        Ok(())
    }
}

pub fn load_cache(cache_file_path: &str, create_if_missing: bool) -> Result<Cache> {
    let path = Path::new(cache_file_path);
    if !path.exists() {
        if create_if_missing {
            info!("Cache file does not exist, starting fresh: {cache_file_path}");
            return Ok(Cache::default());
        }
        let cache_file_string = path_to_string(path)?;
        let error = CacheError::CacheFileNotFound(cache_file_string).into();
        error!("{:?}", error);
        return Err(error);
    }

    info!("Cache exists, loading...");
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            let cache_file_string = path_to_string(path)?;
            let error =
                CacheError::FailedToOpenCacheFile(cache_file_string, err.to_string()).into();
            error!("{:?}", error);
            return Err(error);
        }
    };

    let cache: Cache = match serde_json::from_reader(file) {
        Ok(cache) => cache,
        Err(err) => {
            let error = CacheError::CacheFileWrongFormat(err.to_string()).into();
            error!("{:?}", error);
            return Err(error);
        }
    };

    Ok(cache)
}
