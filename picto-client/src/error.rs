//! API client error types.

use picto_core::CoreError;
use thiserror::Error;

/// Guidance attached to rate-limit errors.
pub const DAILY_QUOTA_GUIDANCE: &str =
    "Please wait before making more requests. Free accounts allow 25 requests per day.";

/// Error type for API client and poller operations.
///
/// Every variant is recoverable by the caller. Nothing here is retried
/// automatically except the poller's bounded status loop.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream rejected the credential (HTTP 401).
    #[error("Invalid API key. Check your key in settings.")]
    InvalidCredential,

    /// Upstream quota exhausted (HTTP 429).
    #[error("Rate limit exceeded. {guidance}")]
    RateLimited {
        /// Vendor quota guidance.
        guidance: String,
        /// Seconds to wait, if upstream said so.
        retry_after: Option<u64>,
    },

    /// Resource does not exist (HTTP 404).
    #[error("Resource not found.")]
    NotFound,

    /// Any other non-success status.
    #[error("API error {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, or the status text when the body is empty.
        body: String,
    },

    /// The download envelope carried no usable URL.
    #[error("No download URL returned from API.")]
    DownloadUnavailable,

    /// The generation task reported failure.
    #[error("Icon generation failed: {reason}")]
    GenerationFailed {
        /// Upstream failure description.
        reason: String,
    },

    /// The task was still running after the attempt budget.
    #[error("Icon generation timed out after {attempts} status checks. Please try again.")]
    GenerationTimeout {
        /// Status fetches performed.
        attempts: u32,
    },

    /// The task completed without any result URL.
    #[error("Generation completed but no icon was returned.")]
    EmptyGenerationResult,

    /// A generation response carried no task id.
    #[error("Generation response did not include a task id")]
    MissingTaskId,

    /// A parameter outside its allowed set, rejected before any request.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// The request could not be completed at the transport level.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Returns true if repeating the same call later may succeed.
    pub fn is_retryable_by_caller(&self) -> bool {
        match self {
            ApiError::RateLimited { .. }
            | ApiError::GenerationTimeout { .. }
            | ApiError::Transport(_) => true,
            ApiError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
            CoreError::Serialization(e) => ApiError::InvalidResponse(e.to_string()),
            other => ApiError::InvalidResponse(other.to_string()),
        }
    }
}
