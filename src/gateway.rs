use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::GatewayError;

/// Lifecycle of an externally issued identity token (captcha networks and
/// the like). `Active` is the only state a mint may proceed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayStatus {
    NotRequested,
    RefreshRequired,
    Active,
    Unknown,
}

/// Issues identity tokens for a gatekeeper network. The handshake is
/// asynchronous: `request_token` returns a status stream the orchestrator
/// watches until the token becomes active or the wait is abandoned.
#[async_trait]
pub trait GatewayProvider {
    fn status(&self) -> GatewayStatus;

    async fn request_token(&self) -> Result<watch::Receiver<GatewayStatus>, GatewayError>;
}
