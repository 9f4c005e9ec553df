//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
#[derive(Error, Debug)]
pub enum Error {
    /// Encryption key has an unsupported length
    #[error("encryption key must be 16, 24, or 32 bytes long, got {length}")]
    InvalidKeyLength { length: usize },

    /// Initialization vector has the wrong length
    #[error("initialization vector must be {expected} bytes long, got {actual}")]
    InvalidIv { expected: usize, actual: usize },

    /// Armored envelope is not parseable or is missing a required field
    #[error("malformed armor envelope: {reason}")]
    MalformedEnvelope { reason: String },

    /// Stored payload could not be decrypted at any supported segment width
    #[error("unable to decrypt stored Vault keys with any supported segment width")]
    DecryptionFailed {
        #[source]
        source: Box<Error>,
    },

    /// Vault keys bundle is missing a required field
    #[error("Vault keys bundle is missing required field `{field}`")]
    MissingField { field: String },

    /// Decrypted payload is not a valid Vault keys bundle
    #[error("decrypted payload is not a valid Vault keys bundle: {0}")]
    CorruptBundle(#[source] serde_json::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Object storage error, propagated unchanged from the backend
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid key length error
    pub fn invalid_key_length(length: usize) -> Self {
        Self::InvalidKeyLength { length }
    }

    /// Create an invalid IV error
    pub fn invalid_iv(expected: usize, actual: usize) -> Self {
        Self::InvalidIv { expected, actual }
    }

    /// Create a malformed envelope error
    pub fn malformed_envelope(reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            reason: reason.into(),
        }
    }

    /// Create a decryption failed error chaining the first attempt's error
    pub fn decryption_failed(source: Error) -> Self {
        Self::DecryptionFailed {
            source: Box::new(source),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
