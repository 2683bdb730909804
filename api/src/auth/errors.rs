use thiserror::Error;

/// Error types for persistent credential storage.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("No data directory available on this platform")]
    NoDataDir,
    #[error("Failed to access credential file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode credentials: {0}")]
    Serialization(#[from] serde_json::Error),
}
