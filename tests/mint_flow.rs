use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fondant::errors::{GatewayError, MintError};
use fondant::gateway::{GatewayProvider, GatewayStatus};
use fondant::guards::{Gatekeeper, GuardSet, NftBurn};
use fondant::mint::{
    GuardMintArgs, MintBackend, MintOrchestrator, MintPhase, MintReceipt, MintRequest,
};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tokio::sync::watch;
use tokio::time::sleep;

struct FakeBackend {
    batching: bool,
    fail_from: Option<usize>,
    error: fn() -> MintError,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn reliable(batching: bool) -> Self {
        FakeBackend {
            batching,
            fail_from: None,
            error: || MintError::Program("unused".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_from(unit: usize, error: fn() -> MintError) -> Self {
        FakeBackend {
            batching: false,
            fail_from: Some(unit),
            error,
            calls: AtomicUsize::new(0),
        }
    }

    fn receipt() -> MintReceipt {
        MintReceipt {
            mint: Pubkey::new_unique(),
            signature: Signature::new_unique(),
        }
    }
}

#[async_trait]
impl MintBackend for FakeBackend {
    fn supports_batching(&self) -> bool {
        self.batching
    }

    async fn mint_batch(
        &self,
        _group_label: Option<&str>,
        units: &[GuardMintArgs],
    ) -> Result<Vec<MintReceipt>, MintError> {
        Ok(units.iter().map(|_| Self::receipt()).collect())
    }

    async fn mint_one(
        &self,
        _group_label: Option<&str>,
        _unit: &GuardMintArgs,
    ) -> Result<MintReceipt, MintError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if Some(call) == self.fail_from {
            return Err((self.error)());
        }
        Ok(Self::receipt())
    }
}

/// Gateway whose token becomes active a little after it is requested.
struct SlowGateway {
    activation_delay: Option<Duration>,
}

#[async_trait]
impl GatewayProvider for SlowGateway {
    fn status(&self) -> GatewayStatus {
        GatewayStatus::NotRequested
    }

    async fn request_token(&self) -> Result<watch::Receiver<GatewayStatus>, GatewayError> {
        let (tx, rx) = watch::channel(GatewayStatus::Unknown);
        let delay = self.activation_delay;
        tokio::spawn(async move {
            match delay {
                Some(delay) => {
                    sleep(delay).await;
                    let _ = tx.send(GatewayStatus::Active);
                }
                None => {
                    // hold the sender so the stream stays open, but never
                    // produce an active token
                    sleep(Duration::from_secs(600)).await;
                    drop(tx);
                }
            }
        });
        Ok(rx)
    }
}

fn gated_rules() -> GuardSet {
    GuardSet {
        gatekeeper: Some(Gatekeeper {
            gatekeeper_network: Pubkey::new_unique(),
            expire_on_use: false,
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn batch_mint_settles_every_unit() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(true));
    let request = MintRequest::new(3, Some("Public".to_string()));

    let settlement = orchestrator
        .mint(&GuardSet::default(), &request, None::<&SlowGateway>)
        .await
        .unwrap();

    assert_eq!(settlement.receipts.len(), 3);
    assert!(settlement.celebrate);
    assert_eq!(orchestrator.minted().len(), 3);
    assert_eq!(orchestrator.phase(), MintPhase::Idle);
}

#[tokio::test]
async fn celebration_fires_only_for_the_first_batch() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(false));

    let first = orchestrator
        .mint(
            &GuardSet::default(),
            &MintRequest::new(1, None),
            None::<&SlowGateway>,
        )
        .await
        .unwrap();
    let second = orchestrator
        .mint(
            &GuardSet::default(),
            &MintRequest::new(1, None),
            None::<&SlowGateway>,
        )
        .await
        .unwrap();

    assert!(first.celebrate);
    assert!(!second.celebrate);
    assert_eq!(orchestrator.minted().len(), 2);
}

#[tokio::test]
async fn sequential_failure_reports_settled_count() {
    let orchestrator = MintOrchestrator::new(FakeBackend::failing_from(2, || {
        MintError::Program("candy machine is empty".to_string())
    }));
    let request = MintRequest::new(4, None);

    let err = orchestrator
        .mint(&GuardSet::default(), &request, None::<&SlowGateway>)
        .await
        .unwrap_err();

    match err {
        MintError::Partial {
            settled, requested, ..
        } => {
            assert_eq!(settled, 2);
            assert_eq!(requested, 4);
        }
        other => panic!("expected partial failure, got {other:?}"),
    }
    // the settled units stay recorded
    assert_eq!(orchestrator.minted().len(), 2);
    assert_eq!(orchestrator.phase(), MintPhase::Idle);
}

#[tokio::test]
async fn immediate_failure_is_not_partial() {
    let orchestrator = MintOrchestrator::new(FakeBackend::failing_from(0, || {
        MintError::UserRejected
    }));
    let request = MintRequest::new(2, None);

    let err = orchestrator
        .mint(&GuardSet::default(), &request, None::<&SlowGateway>)
        .await
        .unwrap_err();

    assert!(matches!(err, MintError::UserRejected));
    assert!(orchestrator.minted().is_empty());
}

#[tokio::test]
async fn gatekeeper_waits_for_an_active_token() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(true));
    let gateway = SlowGateway {
        activation_delay: Some(Duration::from_millis(20)),
    };

    let settlement = orchestrator
        .mint(&gated_rules(), &MintRequest::new(1, None), Some(&gateway))
        .await
        .unwrap();

    assert_eq!(settlement.receipts.len(), 1);
}

#[tokio::test]
async fn gateway_timeout_aborts_the_attempt() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(true))
        .with_gateway_timeout(Duration::from_millis(50));
    let gateway = SlowGateway {
        activation_delay: None,
    };

    let err = orchestrator
        .mint(&gated_rules(), &MintRequest::new(1, None), Some(&gateway))
        .await
        .unwrap_err();

    assert!(matches!(err, MintError::Gateway(GatewayError::Timeout)));
    assert!(orchestrator.minted().is_empty());
    assert_eq!(orchestrator.phase(), MintPhase::Idle);
}

#[tokio::test]
async fn missing_gateway_provider_is_an_error() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(true));

    let err = orchestrator
        .mint(&gated_rules(), &MintRequest::new(1, None), None::<&SlowGateway>)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MintError::Gateway(GatewayError::MissingProvider)
    ));
}

#[tokio::test]
async fn second_attempt_is_rejected_while_one_is_in_flight() {
    let orchestrator = Arc::new(MintOrchestrator::new(FakeBackend::reliable(true)));
    let gateway = Arc::new(SlowGateway {
        activation_delay: Some(Duration::from_secs(60)),
    });

    let background = {
        let orchestrator = orchestrator.clone();
        let gateway = gateway.clone();
        tokio::spawn(async move {
            orchestrator
                .mint(&gated_rules(), &MintRequest::new(1, None), Some(&*gateway))
                .await
        })
    };

    sleep(Duration::from_millis(20)).await;
    assert_eq!(orchestrator.phase(), MintPhase::AwaitingGatewayToken);

    let err = orchestrator
        .mint(
            &GuardSet::default(),
            &MintRequest::new(1, None),
            None::<&SlowGateway>,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MintError::AlreadyMinting));

    // abandoning the pending gateway wait returns the session to idle
    background.abort();
    assert!(background.await.is_err());
    sleep(Duration::from_millis(10)).await;
    assert_eq!(orchestrator.phase(), MintPhase::Idle);

    let settlement = orchestrator
        .mint(
            &GuardSet::default(),
            &MintRequest::new(1, None),
            None::<&SlowGateway>,
        )
        .await
        .unwrap();
    assert!(settlement.celebrate);
}

#[tokio::test]
async fn nft_guard_selections_are_required_per_unit() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(false));
    let rules = GuardSet {
        nft_burn: Some(NftBurn {
            required_collection: Pubkey::new_unique(),
        }),
        ..Default::default()
    };

    // two units, only one has a burn selection
    let request = MintRequest::new(2, None).with_nft_guards(vec![
        GuardMintArgs {
            nft_burn: Some(Pubkey::new_unique()),
            ..Default::default()
        },
        GuardMintArgs::default(),
    ]);

    let err = orchestrator
        .mint(&rules, &request, None::<&SlowGateway>)
        .await
        .unwrap_err();
    assert!(matches!(err, MintError::InvalidRequest(_)));

    let request = MintRequest::new(2, None).with_nft_guards(vec![
        GuardMintArgs {
            nft_burn: Some(Pubkey::new_unique()),
            ..Default::default()
        },
        GuardMintArgs {
            nft_burn: Some(Pubkey::new_unique()),
            ..Default::default()
        },
    ]);
    assert!(orchestrator
        .mint(&rules, &request, None::<&SlowGateway>)
        .await
        .is_ok());
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let orchestrator = MintOrchestrator::new(FakeBackend::reliable(false));
    let request = MintRequest::new(0, None);

    let err = orchestrator
        .mint(&GuardSet::default(), &request, None::<&SlowGateway>)
        .await
        .unwrap_err();
    assert!(matches!(err, MintError::InvalidRequest(_)));
}
