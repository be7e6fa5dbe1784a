//! Fetching asset bytes from short-lived download URLs.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::http::check_status;

/// Default download timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Content type used when the server does not send one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Bytes of a downloaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    /// Raw body.
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the server, without parameters.
    pub content_type: Option<String>,
}

impl FetchedAsset {
    /// Encodes the asset as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE),
            STANDARD.encode(&self.bytes)
        )
    }

    /// Guesses a file extension from the content type.
    pub fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_deref()? {
            "image/png" => Some("png"),
            "image/svg+xml" => Some("svg"),
            "image/gif" => Some("gif"),
            "video/mp4" => Some("mp4"),
            "application/json" => Some("json"),
            "application/postscript" => Some("eps"),
            _ => None,
        }
    }
}

/// Downloads assets from pre-signed URLs.
///
/// No credential is attached: asset links are already authorized and
/// usually point at a CDN, not the API host.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    inner: Client,
}

impl AssetFetcher {
    /// Creates a fetcher with the default timeout.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    /// Fetches an asset.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedAsset, ApiError> {
        debug!("GET asset");
        let response = check_status(self.inner.get(url).send().await?).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let bytes = response.bytes().await?.to_vec();
        debug!(size = bytes.len(), content_type = ?content_type, "Asset received");

        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let asset = FetchedAsset {
            bytes: b"<svg/>".to_vec(),
            content_type: Some("image/svg+xml".to_string()),
        };
        assert_eq!(asset.to_data_url(), "data:image/svg+xml;base64,PHN2Zy8+");
        assert_eq!(asset.extension(), Some("svg"));
    }

    #[test]
    fn test_data_url_without_content_type() {
        let asset = FetchedAsset {
            bytes: vec![0, 1, 2],
            content_type: None,
        };
        assert_eq!(asset.to_data_url(), "data:application/octet-stream;base64,AAEC");
        assert_eq!(asset.extension(), None);
    }
}
