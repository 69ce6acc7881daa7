use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Error setting up fondant: {0}")]
    SetupError(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache file '{0}' not found. Provisioning creates it, or provide one with the --cache option.")]
    CacheFileNotFound(String),

    #[error("Invalid candy machine address: {0}")]
    InvalidCandyMachineAddress(String),

    #[error("Failed to open cache file: {0} with error: {1}")]
    FailedToOpenCacheFile(String, String),

    #[error("Failed to parse cache file with error: {0}")]
    CacheFileWrongFormat(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway token request timed out")]
    Timeout,

    #[error("Guard group requires a gateway token but no gateway provider is configured")]
    MissingProvider,

    #[error("Gateway status stream closed before a token became active")]
    StreamClosed,

    #[error("Gateway rejected the token request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("A mint attempt is already in flight")]
    AlreadyMinting,

    #[error("Invalid mint request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// On-chain rejection, surfaced verbatim. Never retried automatically:
    /// the authoritative state may have changed under us.
    #[error("Minting program rejected the transaction: {0}")]
    Program(String),

    /// The wallet declined to sign. Callers return to idle without raising
    /// an alert.
    #[error("Wallet declined to sign the transaction")]
    UserRejected,

    #[error("{settled} of {requested} item(s) minted before a failure: {reason}")]
    Partial {
        settled: usize,
        requested: usize,
        reason: String,
    },
}
