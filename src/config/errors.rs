use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing the config file: {0}")]
    ParseError(String),

    #[error("Error opening the config file: {0}")]
    FileOpenError(String),

    #[error("Invalid cluster: {0}")]
    InvalidCluster(String),

    #[error("Invalid merkle root value: {0}")]
    InvalidMerkleRoot(String),

    #[error("Group '{0}' has an allow list guard but no root and no address list to derive one from")]
    MissingAllowList(String),

    #[error("Invalid date '{0}': {1}")]
    InvalidDate(String, String),

    #[error("Creator shares must add up to 100, got {0}")]
    InvalidCreatorShare(u16),
}
