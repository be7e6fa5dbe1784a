//! Router, shared state, and the serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::RelayConfig;
use crate::cors::{apply_cors, cors_headers};
use crate::error::RelayError;
use crate::forward::forward;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "picto-relay";

// ============================================================================
// State
// ============================================================================

/// Immutable state shared by all requests.
#[derive(Debug, Clone)]
pub struct RelayState {
    inner: Arc<StateInner>,
}

#[derive(Debug)]
struct StateInner {
    upstream: String,
    client: reqwest::Client,
}

impl RelayState {
    /// Builds state from a configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(StateInner {
                upstream: config.upstream().to_string(),
                client,
            }),
        })
    }

    /// Upstream origin.
    pub fn upstream(&self) -> &str {
        &self.inner.upstream
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

// ============================================================================
// Router
// ============================================================================

/// Builds the relay router. Every path goes through one handler.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .fallback(relay)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn relay(State(state): State<RelayState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight();
    }
    if request.uri().path() == "/" {
        return health();
    }

    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn preflight() -> Response {
    (StatusCode::NO_CONTENT, cors_headers()).into_response()
}

fn health() -> Response {
    let mut response = Json(json!({ "status": "ok", "service": SERVICE_NAME })).into_response();
    apply_cors(response.headers_mut());
    response
}

// ============================================================================
// Serve
// ============================================================================

/// Binds the listen address.
pub async fn bind(config: &RelayConfig) -> Result<TcpListener, RelayError> {
    TcpListener::bind(config.listen)
        .await
        .map_err(RelayError::Bind)
}

/// Serves the relay on a bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: RelayState,
    shutdown: F,
) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?addr, upstream = %state.upstream(), "Relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(RelayError::Serve)?;

    info!("Relay stopped");
    Ok(())
}
