//! HTTP-level tests for the icon client against a mock upstream.

use std::time::Duration;

use picto_client::{ApiError, ClientConfig, IconClient, PollPolicy};
use picto_core::{
    AiFormat, AiStyle, DownloadFormat, GenerationRequest, PngSize, PreviewRequest, SearchQuery,
    TaskStatus,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{
    body_json, header, header_exists, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

/// Client whose base URL carries the `/v1` prefix, like the real API.
fn client_for(server: &MockServer, key: &str) -> IconClient {
    let config = ClientConfig::direct()
        .with_base_url(&format!("{}/v1", server.uri()))
        .unwrap();
    IconClient::with_config(key, config).unwrap()
}

fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(10), max_attempts)
}

fn icon_json(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "slug": name,
        "thumbnails": [{"width": 128, "height": 128, "url": format!("https://cdn/{id}.png")}],
        "style": {"id": 1, "name": "solid"},
        "family": {"id": 7, "name": "basic"},
        "tags": [{"name": "photo", "slug": "photo"}]
    })
}

async fn status_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().starts_with("/v1/ai/text-to-icon/status/"))
        .count()
}

// ============================================================================
// Search & Detail
// ============================================================================

#[tokio::test]
async fn test_search_sends_default_page_size_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .and(query_param("term", "camera"))
        .and(query_param("per_page", "20"))
        .and(header("x-freepik-api-key", KEY))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [icon_json(1, "camera"), icon_json(2, "camera-alt")],
            "meta": {"pagination": {"current_page": 1, "last_page": 3, "per_page": 20, "total": 52}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("camera"))
        .await
        .unwrap();

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].id, 1);
    assert_eq!(result.data[0].thumbnail_url(), Some("https://cdn/1.png"));
    assert_eq!(result.pagination().last_page, 3);
    assert!(result.has_next_page());
}

#[tokio::test]
async fn test_search_encodes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .and(query_param("term", "sun"))
        .and(query_param("page", "2"))
        .and(query_param("filters[color]", "gradient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("sun").page(2).filter("color", "gradient"))
        .await
        .unwrap();

    assert!(result.data.is_empty());
    assert_eq!(result.pagination().current_page, 1);
    assert!(!result.has_next_page());
}

#[tokio::test]
async fn test_empty_term_fails_before_request() {
    let server = MockServer::start().await;

    let err = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidParameter(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_icon_by_id_unwraps_envelope() {
    let server = MockServer::start().await;
    let mut detail = icon_json(42, "rocket");
    detail["created"] = json!("2024-01-01");
    detail["free_svg"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/v1/icons/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": detail})))
        .mount(&server)
        .await;

    let icon = client_for(&server, KEY).get_icon_by_id(42).await.unwrap();

    assert_eq!(icon.icon.id, 42);
    assert_eq!(icon.icon.name, "rocket");
    assert_eq!(icon.free_svg, Some(true));
}

// ============================================================================
// Status Classification
// ============================================================================

#[tokio::test]
async fn test_unauthorized_is_invalid_credential_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons/42/download"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .download_icon(42, DownloadFormat::Png, Some(PngSize::S64))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidCredential));
}

#[tokio::test]
async fn test_empty_credential_is_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .and(header_exists("x-freepik-api-key"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server, "")
        .search_icons(&SearchQuery::new("camera"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidCredential));
}

#[tokio::test]
async fn test_rate_limited_carries_guidance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "60"))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("camera"))
        .await
        .unwrap_err();

    match err {
        ApiError::RateLimited {
            guidance,
            retry_after,
        } => {
            assert!(guidance.contains("25 requests per day"));
            assert_eq!(retry_after, Some(60));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY).get_icon_by_id(999).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn test_other_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("camera"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Upstream { status: 500, body } if body == "boom"));
}

#[tokio::test]
async fn test_other_status_empty_body_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .search_icons(&SearchQuery::new("camera"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::Upstream { status: 503, body } if body == "Service Unavailable")
    );
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_download_png_sends_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons/42/download"))
        .and(query_param("format", "png"))
        .and(query_param("png_size", "64"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"url": "https://cdn/42.png", "filename": "42.png"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client_for(&server, KEY)
        .download_icon(42, DownloadFormat::Png, Some(PngSize::S64))
        .await
        .unwrap();

    assert_eq!(link.url, "https://cdn/42.png");
    assert_eq!(link.filename.as_deref(), Some("42.png"));
}

#[tokio::test]
async fn test_download_svg_omits_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons/42/download"))
        .and(query_param("format", "svg"))
        .and(query_param_is_missing("png_size"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"url": "https://cdn/42.svg"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client_for(&server, KEY)
        .download_icon(42, DownloadFormat::Svg, Some(PngSize::S64))
        .await
        .unwrap();

    assert_eq!(link.url, "https://cdn/42.svg");
}

#[tokio::test]
async fn test_download_without_url_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/icons/42/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .download_icon(42, DownloadFormat::Png, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::DownloadUnavailable));
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_generate_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-icon"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"prompt": "sun icon", "style": "flat"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"task_id": "T1", "status": "CREATED"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client_for(&server, KEY)
        .generate_icon(&GenerationRequest::new("sun icon").style(AiStyle::Flat))
        .await
        .unwrap();

    assert_eq!(task.task_id, "T1");
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_preview_uses_preview_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-icon/preview"))
        .and(body_json(json!({"prompt": "moon"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "P1"})))
        .expect(1)
        .mount(&server)
        .await;

    let task = client_for(&server, KEY)
        .generate_preview(&PreviewRequest::new("moon"))
        .await
        .unwrap();

    assert_eq!(task.task_id, "P1");
}

#[tokio::test]
async fn test_generate_without_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-icon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .generate_icon(&GenerationRequest::new("sun icon"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::MissingTaskId));
}

#[tokio::test]
async fn test_generate_and_wait_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-icon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"task_id": "T1", "status": "CREATED"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "processing"}})),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"status": "completed", "icon_url": "https://cdn/gen/T1.png"}
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let icon = client_for(&server, KEY)
        .generate_and_wait(
            &GenerationRequest::new("sun icon"),
            &fast_policy(30),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(icon.task_id, "T1");
    assert_eq!(icon.url, "https://cdn/gen/T1.png");
    assert_eq!(status_requests(&server).await, 2);
}

#[tokio::test]
async fn test_poll_times_out_after_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "IN_PROGRESS"}})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .poll_generation("T2", &fast_policy(3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::GenerationTimeout { attempts: 3 }));
    assert_eq!(status_requests(&server).await, 3);
}

#[tokio::test]
async fn test_poll_failed_task_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"status": "failed", "error": "Prompt violates policy"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .poll_generation("T3", &fast_policy(30), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::GenerationFailed { reason } if reason == "Prompt violates policy")
    );
    assert_eq!(status_requests(&server).await, 1);
}

#[tokio::test]
async fn test_poll_failed_with_structured_error_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"status": "FAILED", "error": {"message": "nsfw"}}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, KEY)
        .poll_generation("T4", &fast_policy(30), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::GenerationFailed { reason } if reason == "nsfw"));
    assert_eq!(status_requests(&server).await, 1);
}

#[tokio::test]
async fn test_poll_completed_with_null_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ai/text-to-icon/status/T5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "status": "COMPLETED",
                "icon_url": "https://cdn.example.dev/icon.png",
                "generated": null
            }
        })))
        .mount(&server)
        .await;

    let icon = client_for(&server, KEY)
        .poll_generation("T5", &fast_policy(30), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(icon.url, "https://cdn.example.dev/icon.png");
    assert_eq!(status_requests(&server).await, 1);
}

#[tokio::test]
async fn test_render_posts_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ai/text-to-icon/T1/render/svg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"url": "https://cdn/gen/T1.svg"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client_for(&server, KEY)
        .download_generated_icon("T1", AiFormat::Svg)
        .await
        .unwrap();

    assert_eq!(link.url, "https://cdn/gen/T1.svg");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

// ============================================================================
// Asset Fetching
// ============================================================================

#[tokio::test]
async fn test_asset_fetch_builds_data_url_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/42.svg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/svg+xml; charset=utf-8")
                .set_body_bytes(b"<svg/>".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = picto_client::AssetFetcher::new().unwrap();
    let asset = fetcher
        .fetch(&format!("{}/assets/42.svg", server.uri()))
        .await
        .unwrap();

    assert_eq!(asset.content_type.as_deref(), Some("image/svg+xml"));
    assert_eq!(asset.to_data_url(), "data:image/svg+xml;base64,PHN2Zy8+");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("x-freepik-api-key").is_none());
}
