//! Core error types for Picto.

use thiserror::Error;

/// Core error type for Picto operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value outside one of the enumerated parameter sets.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The document-insertion collaborator rejected an asset.
    #[error("Asset sink failed: {0}")]
    Sink(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
