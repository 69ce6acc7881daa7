use anyhow::{anyhow, Result};
use dateparser::DateTimeUtc;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use super::{data::price_as_lamports, to_pubkey, to_string};
use crate::config::data::AllowListData;
use crate::config::errors::ConfigError;
use crate::guards;
use crate::guards::allowlist;

/// Human-friendly guard configuration: string dates, SOL amounts, hex
/// merkle roots. `to_guard_format` converts into the runtime representation
/// the resolver and evaluator consume.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CandyGuardData {
    pub default: GuardSet,
    pub groups: Option<Vec<Group>>,
}

impl CandyGuardData {
    pub fn to_guard_format(&self) -> Result<guards::CandyGuardData> {
        let groups = if let Some(groups) = &self.groups {
            let mut group_vec = Vec::with_capacity(groups.len());

            for group in groups {
                group_vec.push(group.to_guard_format()?);
            }

            group_vec
        } else {
            Vec::new()
        };

        Ok(guards::CandyGuardData {
            default: self.default.to_guard_format()?,
            groups,
        })
    }

    /// Fill in missing allow-list roots from plain address lists, keyed by
    /// group label ("default" for the default set). An allow-list guard that
    /// ends up with neither a root nor a list is a configuration error.
    pub fn with_allow_list_roots(&self, lists: &[AllowListData]) -> Result<Self, ConfigError> {
        let mut resolved = self.clone();

        resolve_root(&mut resolved.default, "default", lists)?;
        if let Some(groups) = resolved.groups.as_mut() {
            for group in groups.iter_mut() {
                let label = group.label.clone();
                resolve_root(&mut group.guards, &label, lists)?;
            }
        }

        Ok(resolved)
    }
}

fn resolve_root(
    guards: &mut GuardSet,
    label: &str,
    lists: &[AllowListData],
) -> Result<(), ConfigError> {
    let allow_list = match guards.allow_list.as_mut() {
        Some(allow_list) if allow_list.merkle_root.is_none() => allow_list,
        _ => return Ok(()),
    };

    let list = lists
        .iter()
        .find(|l| l.label == label)
        .ok_or_else(|| ConfigError::MissingAllowList(label.to_string()))?;

    let mut leaves = Vec::with_capacity(list.addresses.len());
    for address in &list.addresses {
        let pubkey: Pubkey = address
            .parse()
            .map_err(|_| ConfigError::ParseError(format!("invalid address: {address}")))?;
        leaves.push(pubkey.to_bytes());
    }

    allow_list.merkle_root = Some(hex::encode(allowlist::merkle_root(&leaves)));
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Group {
    pub label: String,
    pub guards: GuardSet,
}

impl Group {
    pub fn to_guard_format(&self) -> Result<guards::Group> {
        Ok(guards::Group {
            label: self.label.clone(),
            guards: self.guards.to_guard_format()?,
        })
    }
}

/// The set of guards available.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GuardSet {
    /// Last instruction check and bot tax (penalty for invalid transactions).
    pub bot_tax: Option<BotTax>,
    /// Sol payment guard (set the price for the mint in lamports).
    pub sol_payment: Option<SolPayment>,
    /// Token payment guard (set the price for the mint in spl-token amount).
    pub token_payment: Option<TokenPayment>,
    /// Start date guard (controls when minting is allowed).
    pub start_date: Option<StartDate>,
    /// Token gate guard (restrict access to holders of a specific token).
    pub token_gate: Option<TokenGate>,
    /// Gatekeeper guard
    pub gatekeeper: Option<Gatekeeper>,
    /// End date guard
    pub end_date: Option<EndDate>,
    /// Allow list guard
    pub allow_list: Option<AllowList>,
    /// Mint limit guard
    pub mint_limit: Option<MintLimit>,
    /// NFT Payment
    pub nft_payment: Option<NftPayment>,
    /// Redeemed amount guard
    pub redeemed_amount: Option<RedeemedAmount>,
    /// Address gate (check access against a specified address)
    pub address_gate: Option<AddressGate>,
    /// NFT gate guard (check access based on holding a specified NFT)
    pub nft_gate: Option<NftGate>,
    /// NFT burn guard (burn a specified NFT)
    pub nft_burn: Option<NftBurn>,
    /// Token burn guard (burn a specified amount of spl-token)
    pub token_burn: Option<TokenBurn>,
}

impl GuardSet {
    pub fn to_guard_format(&self) -> Result<guards::GuardSet> {
        Ok(guards::GuardSet {
            bot_tax: self.bot_tax.as_ref().map(|g| g.to_guard_format()).transpose()?,
            sol_payment: self
                .sol_payment
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            token_payment: self
                .token_payment
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            start_date: self
                .start_date
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            token_gate: self
                .token_gate
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            gatekeeper: self
                .gatekeeper
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            end_date: self.end_date.as_ref().map(|g| g.to_guard_format()).transpose()?,
            allow_list: self
                .allow_list
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            mint_limit: self
                .mint_limit
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            nft_payment: self
                .nft_payment
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            redeemed_amount: self
                .redeemed_amount
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            address_gate: self
                .address_gate
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
            nft_gate: self.nft_gate.as_ref().map(|g| g.to_guard_format()).transpose()?,
            nft_burn: self.nft_burn.as_ref().map(|g| g.to_guard_format()).transpose()?,
            token_burn: self
                .token_burn
                .as_ref()
                .map(|g| g.to_guard_format())
                .transpose()?,
        })
    }
}

// Address gate guard

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddressGate {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub address: Pubkey,
}

impl AddressGate {
    pub fn to_guard_format(&self) -> Result<guards::AddressGate> {
        Ok(guards::AddressGate {
            address: self.address,
        })
    }
}

// Allow list guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AllowList {
    /// Hex merkle root. May be omitted when an address list with the same
    /// label is declared in the config; provisioning derives the root.
    pub merkle_root: Option<String>,
}

impl AllowList {
    pub fn to_guard_format(&self) -> Result<guards::AllowList> {
        let merkle_root = self
            .merkle_root
            .as_ref()
            .ok_or_else(|| anyhow!("Missing merkle root value for allow list guard"))?;
        let root: [u8; 32] = hex::decode(merkle_root)?
            .try_into()
            .map_err(|_| anyhow!("Invalid merkle root value: {}", merkle_root))?;
        Ok(guards::AllowList { merkle_root: root })
    }
}

// Bot tax guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BotTax {
    pub value: f64,

    pub last_instruction: bool,
}

impl BotTax {
    pub fn to_guard_format(&self) -> Result<guards::BotTax> {
        Ok(guards::BotTax {
            lamports: price_as_lamports(self.value),
            last_instruction: self.last_instruction,
        })
    }
}

// End date guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EndDate {
    pub date: String,
}

impl EndDate {
    pub fn to_guard_format(&self) -> Result<guards::EndDate> {
        let timestamp = self.date.parse::<DateTimeUtc>()?.0.timestamp();

        Ok(guards::EndDate { date: timestamp })
    }
}

// Gatekeeper guard

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Gatekeeper {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub gatekeeper_network: Pubkey,

    pub expire_on_use: bool,
}

impl Gatekeeper {
    pub fn to_guard_format(&self) -> Result<guards::Gatekeeper> {
        Ok(guards::Gatekeeper {
            gatekeeper_network: self.gatekeeper_network,
            expire_on_use: self.expire_on_use,
        })
    }
}

// Mint limit guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MintLimit {
    pub id: u8,

    pub limit: u16,
}

impl MintLimit {
    pub fn to_guard_format(&self) -> Result<guards::MintLimit> {
        Ok(guards::MintLimit {
            id: self.id,
            limit: self.limit as u32,
        })
    }
}

// Nft burn guard

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NftBurn {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub required_collection: Pubkey,
}

impl NftBurn {
    pub fn to_guard_format(&self) -> Result<guards::NftBurn> {
        Ok(guards::NftBurn {
            required_collection: self.required_collection,
        })
    }
}

// Nft gate guard

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NftGate {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub required_collection: Pubkey,
}

impl NftGate {
    pub fn to_guard_format(&self) -> Result<guards::NftGate> {
        Ok(guards::NftGate {
            required_collection: self.required_collection,
        })
    }
}

// Nft payment guard

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NftPayment {
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub required_collection: Pubkey,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub destination: Pubkey,
}

impl NftPayment {
    pub fn to_guard_format(&self) -> Result<guards::NftPayment> {
        Ok(guards::NftPayment {
            required_collection: self.required_collection,
            destination: self.destination,
        })
    }
}

// Redeemed amount guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RedeemedAmount {
    pub maximum: u64,
}

impl RedeemedAmount {
    pub fn to_guard_format(&self) -> Result<guards::RedeemedAmount> {
        Ok(guards::RedeemedAmount {
            maximum: self.maximum,
        })
    }
}

// Sol payment guard

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SolPayment {
    pub value: f64,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub destination: Pubkey,
}

impl SolPayment {
    pub fn to_guard_format(&self) -> Result<guards::SolPayment> {
        Ok(guards::SolPayment {
            lamports: price_as_lamports(self.value),
            destination: self.destination,
        })
    }
}

// Start date guard

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StartDate {
    pub date: String,
}

impl StartDate {
    pub fn to_guard_format(&self) -> Result<guards::StartDate> {
        let timestamp = self.date.parse::<DateTimeUtc>()?.0.timestamp();
        Ok(guards::StartDate { date: timestamp })
    }
}

// Token burn guard

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenBurn {
    pub amount: u64,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub mint: Pubkey,

    #[serde(default)]
    pub decimals: u8,

    #[serde(default)]
    pub symbol: Option<String>,
}

impl TokenBurn {
    pub fn to_guard_format(&self) -> Result<guards::TokenBurn> {
        Ok(guards::TokenBurn {
            amount: self.amount,
            mint: self.mint,
            decimals: self.decimals,
            symbol: self.symbol.clone(),
        })
    }
}

// Token gate guard

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenGate {
    pub amount: u64,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub mint: Pubkey,

    #[serde(default)]
    pub decimals: u8,

    #[serde(default)]
    pub symbol: Option<String>,
}

impl TokenGate {
    pub fn to_guard_format(&self) -> Result<guards::TokenGate> {
        Ok(guards::TokenGate {
            amount: self.amount,
            mint: self.mint,
            decimals: self.decimals,
            symbol: self.symbol.clone(),
        })
    }
}

// Token payment guard

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayment {
    pub amount: u64,

    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub mint: Pubkey,

    /// Wallet that receives the payment; the associated token account is
    /// derived from it.
    #[serde(deserialize_with = "to_pubkey")]
    #[serde(serialize_with = "to_string")]
    pub destination: Pubkey,

    #[serde(default)]
    pub decimals: u8,

    #[serde(default)]
    pub symbol: Option<String>,
}

impl TokenPayment {
    pub fn to_guard_format(&self) -> Result<guards::TokenPayment> {
        Ok(guards::TokenPayment {
            amount: self.amount,
            mint: self.mint,
            destination_ata: get_associated_token_address(&self.destination, &self.mint),
            decimals: self.decimals,
            symbol: self.symbol.clone(),
        })
    }
}
