//! Forwarding one request to the upstream origin.

use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use axum::body::{Body, BodyDataStream, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, Method, Uri};
use axum::response::Response;
use futures::Stream;
use hyper::ext::ReasonPhrase;
use tracing::{debug, instrument, warn};

use crate::cors::apply_cors;
use crate::error::RelayError;
use crate::server::RelayState;

/// Request headers copied to the upstream request. Everything else is
/// dropped.
pub const FORWARDED_HEADERS: &[&str] = &["x-freepik-api-key", "content-type"];

/// Connection-scoped headers never copied back to the caller.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Builds the upstream URL: origin + path + query, verbatim.
pub fn target_url(upstream: &str, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    format!("{upstream}{path_and_query}")
}

/// Selects the allow-listed request headers.
pub fn forwarded_request_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in FORWARDED_HEADERS {
        for value in incoming.get_all(*name) {
            headers.append(HeaderName::from_static(*name), value.clone());
        }
    }
    headers
}

/// Copies upstream response headers minus hop-by-hop headers.
pub fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = upstream.clone();
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
    headers
}

/// Forwards a request and streams the upstream response back.
#[instrument(skip(state, request), fields(method = %request.method(), path = %request.uri().path()))]
pub async fn forward(state: &RelayState, request: Request) -> Result<Response, RelayError> {
    let (parts, body) = request.into_parts();
    let url = target_url(state.upstream(), &parts.uri);

    let mut upstream_request = state
        .client()
        .request(parts.method.clone(), &url)
        .headers(forwarded_request_headers(&parts.headers));

    if parts.method != Method::GET && parts.method != Method::HEAD {
        let stream = SyncBodyStream::new(body.into_data_stream());
        upstream_request = upstream_request.body(reqwest::Body::wrap_stream(stream));
    }

    let upstream = upstream_request.send().await.map_err(|e| {
        warn!(error = %e, "Upstream request failed");
        RelayError::UpstreamUnreachable(e.to_string())
    })?;
    debug!(status = %upstream.status(), "Upstream responded");

    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let headers = response_headers(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    apply_cors(response.headers_mut());

    Ok(response)
}

/// Makes the inbound body stream `Sync` so the HTTP client can send it.
struct SyncBodyStream(Mutex<BodyDataStream>);

impl SyncBodyStream {
    fn new(stream: BodyDataStream) -> Self {
        Self(Mutex::new(stream))
    }
}

impl Stream for SyncBodyStream {
    type Item = Result<Bytes, axum::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let inner = self
            .get_mut()
            .0
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        Pin::new(inner).poll_next(cx)
    }
}
