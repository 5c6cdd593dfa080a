//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid API key format")]
    InvalidKeyFormat,

    #[error("Invalid API secret format")]
    InvalidSecretFormat,

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Credentials were rejected by the platform")]
    CredentialRejected,

    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// User-fixable errors that map to a 400 at the HTTP boundary.
    /// Storage and encryption failures stay internal.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlatform(_)
                | Self::InvalidKeyFormat
                | Self::InvalidSecretFormat
                | Self::MissingRequiredField(_)
                | Self::CredentialRejected
                | Self::InvalidInput(_)
        )
    }
}
