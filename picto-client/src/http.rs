//! Authenticated HTTP transport for the icon API.
//!
//! Wraps a reqwest client with:
//! - Base URL joining
//! - The credential header on every request
//! - Request/response tracing
//! - Status classification into [`ApiError`]

use picto_core::Credential;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, DAILY_QUOTA_GUIDANCE};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-freepik-api-key";

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client bound to one base URL and one credential.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    config: ClientConfig,
    api_key: HeaderValue,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url())
            .field("api_key", &"***")
            .finish()
    }
}

impl HttpClient {
    /// Creates a client for the given configuration and credential.
    ///
    /// The credential is not validated. It only fails locally when it
    /// cannot be carried in an HTTP header.
    pub fn new(config: ClientConfig, credential: &Credential) -> Result<Self, ApiError> {
        let mut api_key = HeaderValue::from_str(credential.expose()).map_err(|_| {
            ApiError::InvalidParameter("API key contains characters not allowed in a header".into())
        })?;
        api_key.set_sensitive(true);

        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            inner,
            config,
            api_key,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        self.inner
            .request(method, self.config.endpoint_url(path))
            .headers(headers)
    }

    /// Performs a GET request with query parameters and decodes the JSON body.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("GET request");
        let response = self.request(Method::GET, path).query(query).send().await?;
        debug!(status = %response.status(), "Response received");
        decode(check_status(response).await?).await
    }

    /// Performs a POST request and decodes the JSON body.
    ///
    /// The body is sent as JSON when present; otherwise the request has no
    /// body at all.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(has_body = body.is_some(), "POST request");
        let mut request = self.request(Method::POST, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        debug!(status = %response.status(), "Response received");
        decode(check_status(response).await?).await
    }
}

/// Maps a non-success response to its error kind.
pub(crate) async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::InvalidCredential),
        StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited {
            guidance: DAILY_QUOTA_GUIDANCE.to_string(),
            retry_after: response.retry_after_secs(),
        }),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        _ => {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            warn!(status = status.as_u16(), "Upstream returned an error");
            Err(ApiError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        warn!(error = %e, "Failed to decode response body");
        ApiError::InvalidResponse(e.to_string())
    })
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================
