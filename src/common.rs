pub use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use anyhow::{anyhow, Result};
pub use indexmap::IndexMap;
pub use serde::Deserialize;
pub use serde_json::{json, Value};
pub use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
pub use tracing::{debug, error, info, warn};

pub use crate::cache::{load_cache, Cache, CacheProgram};
pub use crate::constants::*;
pub use crate::errors::*;
pub use crate::setup::{fondant_setup, setup_rpc_client};
pub use crate::utils::path_to_string;
