pub mod data;
pub mod errors;
pub mod guard_data;
pub mod parser;

use std::{fmt::Display, str::FromStr};

pub use data::*;
pub use errors::*;
pub use guard_data::*;
pub use parser::*;
use serde::{Deserialize, Deserializer, Serializer};
use solana_sdk::pubkey::Pubkey;

pub fn to_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn to_option_string<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(&v),
        None => serializer.serialize_none(),
    }
}

pub fn to_pubkey<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Pubkey::from_str(&value).map_err(serde::de::Error::custom)
}

pub fn to_option_pubkey<'de, D>(deserializer: D) -> Result<Option<Pubkey>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(value) if !value.is_empty() => Pubkey::from_str(&value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
