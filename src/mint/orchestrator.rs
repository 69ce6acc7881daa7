//! Drives a mint attempt end to end: gateway-token handshake, submission
//! through the external minting program, settlement bookkeeping. One attempt
//! may be in flight per session; a second call is rejected while the first
//! is running.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::data::Cluster;
use crate::errors::{GatewayError, MintError};
use crate::gateway::{GatewayProvider, GatewayStatus};
use crate::guards::GuardSet;
use crate::utils::solscan_url;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-item guard arguments: which owned NFT instance satisfies each NFT
/// guard for that unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardMintArgs {
    pub nft_burn: Option<Pubkey>,
    pub nft_payment: Option<Pubkey>,
    pub nft_gate: Option<Pubkey>,
}

/// One mint attempt. Constructed fresh per attempt and consumed exactly
/// once.
#[derive(Clone, Debug)]
pub struct MintRequest {
    pub quantity: u32,
    pub group_label: Option<String>,
    pub nft_guards: Vec<GuardMintArgs>,
}

impl MintRequest {
    pub fn new(quantity: u32, group_label: Option<String>) -> Self {
        MintRequest {
            quantity,
            group_label,
            nft_guards: vec![GuardMintArgs::default(); quantity as usize],
        }
    }

    pub fn with_nft_guards(mut self, nft_guards: Vec<GuardMintArgs>) -> Self {
        self.nft_guards = nft_guards;
        self
    }

    fn validate(&self, guards: &GuardSet) -> Result<(), MintError> {
        if self.quantity == 0 {
            return Err(MintError::InvalidRequest("quantity must be at least 1".into()));
        }
        if self.nft_guards.len() != self.quantity as usize {
            return Err(MintError::InvalidRequest(format!(
                "expected {} NFT selections, got {}",
                self.quantity,
                self.nft_guards.len()
            )));
        }

        for (index, unit) in self.nft_guards.iter().enumerate() {
            if guards.nft_burn.is_some() && unit.nft_burn.is_none() {
                return Err(MintError::InvalidRequest(format!(
                    "item {index} is missing an NFT to burn"
                )));
            }
            if guards.nft_payment.is_some() && unit.nft_payment.is_none() {
                return Err(MintError::InvalidRequest(format!(
                    "item {index} is missing an NFT to pay with"
                )));
            }
            if guards.nft_gate.is_some() && unit.nft_gate.is_none() {
                return Err(MintError::InvalidRequest(format!(
                    "item {index} is missing a gate NFT"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub mint: Pubkey,
    pub signature: Signature,
}

impl MintReceipt {
    pub fn explorer_url(&self, cluster: &Cluster) -> String {
        solscan_url(&self.mint.to_string(), cluster)
    }
}

/// Outcome of a settled attempt. `celebrate` is set when this batch is
/// recorded as the session's first, the storefront's cue for its one-off
/// confetti effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub receipts: Vec<MintReceipt>,
    pub celebrate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintPhase {
    Idle,
    AwaitingGatewayToken,
    Submitting,
}

/// Submits mint instructions to the external minting program. One
/// instruction per unit; a backend that can batch submits them as a single
/// atomic transaction.
#[async_trait]
pub trait MintBackend {
    fn supports_batching(&self) -> bool {
        false
    }

    /// Submit every unit atomically. Either all receipts come back or the
    /// whole transaction failed.
    async fn mint_batch(
        &self,
        group_label: Option<&str>,
        units: &[GuardMintArgs],
    ) -> Result<Vec<MintReceipt>, MintError>;

    /// Submit a single unit.
    async fn mint_one(
        &self,
        group_label: Option<&str>,
        unit: &GuardMintArgs,
    ) -> Result<MintReceipt, MintError>;
}

pub struct MintOrchestrator<B> {
    backend: B,
    phase: Mutex<MintPhase>,
    minted: Mutex<Vec<MintReceipt>>,
    gateway_timeout: Duration,
}

/// Reentrancy guard. Dropping it returns the orchestrator to `Idle`, so an
/// abandoned gateway wait cannot wedge the session or resume the mint.
struct InFlight<'a> {
    phase: &'a Mutex<MintPhase>,
}

impl<'a> InFlight<'a> {
    fn begin(phase: &'a Mutex<MintPhase>, next: MintPhase) -> Result<Self, MintError> {
        let mut current = phase.lock().unwrap();
        if *current != MintPhase::Idle {
            return Err(MintError::AlreadyMinting);
        }
        *current = next;
        Ok(InFlight { phase })
    }

    fn advance(&self, next: MintPhase) {
        *self.phase.lock().unwrap() = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.phase.lock().unwrap() = MintPhase::Idle;
    }
}

impl<B: MintBackend> MintOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        MintOrchestrator {
            backend,
            phase: Mutex::new(MintPhase::Idle),
            minted: Mutex::new(Vec::new()),
            gateway_timeout: GATEWAY_TIMEOUT,
        }
    }

    pub fn with_gateway_timeout(mut self, gateway_timeout: Duration) -> Self {
        self.gateway_timeout = gateway_timeout;
        self
    }

    pub fn phase(&self) -> MintPhase {
        *self.phase.lock().unwrap()
    }

    /// Every receipt settled this session, in order.
    pub fn minted(&self) -> Vec<MintReceipt> {
        self.minted.lock().unwrap().clone()
    }

    /// Run one mint attempt under the given effective rule set. When the
    /// rule set carries a gatekeeper guard the attempt suspends until the
    /// gateway token is active; without one the request goes straight to
    /// submission.
    pub async fn mint<G>(
        &self,
        guards: &GuardSet,
        request: &MintRequest,
        gateway: Option<&G>,
    ) -> Result<Settlement, MintError>
    where
        G: GatewayProvider + Sync,
    {
        request.validate(guards)?;

        let needs_token = guards.gatekeeper.is_some();
        let flight = InFlight::begin(
            &self.phase,
            if needs_token {
                MintPhase::AwaitingGatewayToken
            } else {
                MintPhase::Submitting
            },
        )?;

        if needs_token {
            let gateway = gateway.ok_or(GatewayError::MissingProvider)?;
            if gateway.status() != GatewayStatus::Active {
                info!("Requesting gateway token");
                self.await_active_token(gateway).await?;
            }
            flight.advance(MintPhase::Submitting);
        }

        let label = request.group_label.as_deref();
        let receipts = if self.backend.supports_batching() {
            self.backend.mint_batch(label, &request.nft_guards).await?
        } else {
            self.submit_sequentially(label, request).await?
        };

        let mut minted = self.minted.lock().unwrap();
        let celebrate = minted.is_empty();
        minted.extend(receipts.iter().cloned());
        info!("Settled {} item(s)", receipts.len());

        Ok(Settlement {
            receipts,
            celebrate,
        })
    }

    async fn await_active_token<G>(&self, gateway: &G) -> Result<(), GatewayError>
    where
        G: GatewayProvider + Sync,
    {
        let mut statuses = gateway.request_token().await?;

        let wait = async {
            loop {
                if *statuses.borrow() == GatewayStatus::Active {
                    return Ok(());
                }
                if statuses.changed().await.is_err() {
                    return Err(GatewayError::StreamClosed);
                }
            }
        };

        match timeout(self.gateway_timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        }
    }

    /// One transaction per unit. A failure partway through is reported with
    /// the count of units that actually settled; the settled receipts stay
    /// recorded.
    async fn submit_sequentially(
        &self,
        label: Option<&str>,
        request: &MintRequest,
    ) -> Result<Vec<MintReceipt>, MintError> {
        let mut receipts = Vec::with_capacity(request.nft_guards.len());

        for unit in &request.nft_guards {
            match self.backend.mint_one(label, unit).await {
                Ok(receipt) => receipts.push(receipt),
                Err(err) => {
                    if receipts.is_empty() {
                        return Err(err);
                    }
                    warn!("Mint failed after {} settled item(s): {err}", receipts.len());
                    let settled = receipts.len();
                    self.minted.lock().unwrap().extend(receipts);
                    return Err(MintError::Partial {
                        settled,
                        requested: request.quantity as usize,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(receipts)
    }
}
