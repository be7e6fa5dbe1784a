//! The icon API client.

use async_trait::async_trait;
use picto_core::{
    AiFormat, AssetLink, Credential, DownloadFormat, DownloadRequest, GeneratedIcon,
    GenerationRequest, GenerationTask, IconDetail, PngSize, PreviewRequest, SearchQuery,
    SearchResult,
};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::poller::{PollPolicy, TaskStatusSource, poll_until_complete};

/// `{"data": ...}` response wrapper.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

// ============================================================================
// Icon Client
// ============================================================================

/// Client for the stock icon catalogue and the AI generation service.
///
/// Each operation makes exactly one request. Nothing is retried or cached.
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct IconClient {
    http: HttpClient,
}

impl IconClient {
    /// Creates a client that talks to the upstream API directly.
    pub fn new(credential: impl Into<Credential>) -> Result<Self, ApiError> {
        Self::with_config(credential, ClientConfig::direct())
    }

    /// Creates a client with a custom configuration.
    pub fn with_config(
        credential: impl Into<Credential>,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let credential = credential.into();
        Ok(Self {
            http: HttpClient::new(config, &credential)?,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    // ------------------------------------------------------------------------
    // Catalogue
    // ------------------------------------------------------------------------

    /// Searches the stock icon catalogue.
    #[instrument(skip(self, query), fields(term = %query.term, page = query.page))]
    pub async fn search_icons(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        query.validate()?;
        let result: SearchResult = self
            .http
            .get(endpoints::ICON_SEARCH, &query.query_pairs())
            .await?;
        debug!(
            results = result.data.len(),
            last_page = result.pagination().last_page,
            "Search complete"
        );
        Ok(result)
    }

    /// Fetches a single icon's details.
    #[instrument(skip(self))]
    pub async fn get_icon_by_id(&self, id: u64) -> Result<IconDetail, ApiError> {
        let envelope: DataEnvelope<IconDetail> =
            self.http.get(&endpoints::icon(id), &[] as &[(&str, &str)]).await?;
        Ok(envelope.data)
    }

    /// Requests a download link for a stock icon.
    ///
    /// `png_size` is only sent for PNG downloads.
    #[instrument(skip(self))]
    pub async fn download_icon(
        &self,
        id: u64,
        format: DownloadFormat,
        png_size: Option<PngSize>,
    ) -> Result<AssetLink, ApiError> {
        let request = DownloadRequest::new(id, format, png_size);
        let body: Value = self
            .http
            .get(&endpoints::icon_download(id), &request.query_pairs())
            .await?;
        asset_link(&body).ok_or(ApiError::DownloadUnavailable)
    }

    // ------------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------------

    /// Submits a full generation.
    #[instrument(skip(self, request), fields(style = ?request.style))]
    pub async fn generate_icon(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationTask, ApiError> {
        request.validate()?;
        let body: Value = self.http.post(endpoints::AI_GENERATE, Some(request)).await?;
        let task = GenerationTask::from_response(&body).ok_or(ApiError::MissingTaskId)?;
        info!(task_id = %task.task_id, "Generation submitted");
        Ok(task)
    }

    /// Submits a preview generation.
    #[instrument(skip(self, request), fields(style = ?request.style))]
    pub async fn generate_preview(
        &self,
        request: &PreviewRequest,
    ) -> Result<GenerationTask, ApiError> {
        request.validate()?;
        let body: Value = self.http.post(endpoints::AI_PREVIEW, Some(request)).await?;
        let task = GenerationTask::from_response(&body).ok_or(ApiError::MissingTaskId)?;
        info!(task_id = %task.task_id, "Preview submitted");
        Ok(task)
    }

    /// Fetches a generation task's current state.
    #[instrument(skip(self))]
    pub async fn generation_status(&self, task_id: &str) -> Result<GenerationTask, ApiError> {
        let body: Value = self
            .http
            .get(&endpoints::ai_status(task_id), &[] as &[(&str, &str)])
            .await?;
        Ok(GenerationTask::from_status_response(task_id, &body))
    }

    /// Requests a download link for a generated icon.
    #[instrument(skip(self))]
    pub async fn download_generated_icon(
        &self,
        task_id: &str,
        format: AiFormat,
    ) -> Result<AssetLink, ApiError> {
        let body: Value = self
            .http
            .post::<(), _>(&endpoints::ai_render(task_id, format), None)
            .await?;
        asset_link(&body).ok_or(ApiError::DownloadUnavailable)
    }

    /// Polls a task until it yields a result.
    pub async fn poll_generation(
        &self,
        task_id: &str,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<GeneratedIcon, ApiError> {
        poll_until_complete(self, task_id, policy, cancel).await
    }

    /// Submits a full generation and polls it to completion.
    pub async fn generate_and_wait(
        &self,
        request: &GenerationRequest,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<GeneratedIcon, ApiError> {
        let task = self.generate_icon(request).await?;
        self.poll_generation(&task.task_id, policy, cancel).await
    }
}

#[async_trait]
impl TaskStatusSource for IconClient {
    async fn task_status(&self, task_id: &str) -> Result<GenerationTask, ApiError> {
        self.generation_status(task_id).await
    }
}

/// Extracts `data.url` (or a top-level `url`) from a download envelope.
fn asset_link(body: &Value) -> Option<AssetLink> {
    let data = body.get("data").unwrap_or(body);
    let url = data
        .get("url")
        .or_else(|| body.get("url"))
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())?;
    let filename = data
        .get("filename")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(AssetLink {
        url: url.to_string(),
        filename,
    })
}
