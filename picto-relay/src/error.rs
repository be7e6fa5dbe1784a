//! Relay error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::cors::apply_cors;

/// Error type for relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream request failed before a response arrived.
    #[error("{0}")]
    UpstreamUnreachable(String),

    /// The relay configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The listen address could not be bound.
    #[error("Failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        apply_cors(response.headers_mut());
        response
    }
}
