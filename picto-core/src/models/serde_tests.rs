//! Serde deserialization tests against upstream-shaped payloads.

use serde_json::json;

use crate::{
    DownloadFormat, IconDetail, PngSize, SearchResult, SortOrder, TaskStatus,
};

// ============================================================================
// Search Result Tests
// ============================================================================

#[test]
fn test_search_result_with_pagination() {
    let body = json!({
        "data": [
            {
                "id": 101,
                "name": "Camera",
                "slug": "camera_101",
                "thumbnails": [{"width": 128, "height": 128, "url": "https://cdn/101.png"}],
                "style": {"id": 3, "name": "lineal"},
                "family": {"id": 9, "name": "Basic"},
                "tags": [{"name": "camera", "slug": "camera"}, {"name": "photo"}]
            },
            {"id": 102, "name": "Lens", "slug": "lens_102"}
        ],
        "meta": {"pagination": {"current_page": 1, "last_page": 3, "per_page": 20, "total": 55}}
    });

    let result: SearchResult = serde_json::from_value(body).unwrap();
    assert_eq!(result.data.len(), 2);
    assert_eq!(result.pagination().current_page, 1);
    assert_eq!(result.pagination().last_page, 3);
    assert_eq!(result.pagination().total, Some(55));

    let first = &result.data[0];
    assert_eq!(first.thumbnail_url(), Some("https://cdn/101.png"));
    assert_eq!(first.tag_names(), vec!["camera", "photo"]);
    assert_eq!(first.style.as_ref().map(|s| s.name.as_str()), Some("lineal"));

    let second = &result.data[1];
    assert!(second.thumbnails.is_empty());
    assert!(second.family.is_none());
}

#[test]
fn test_pagination_defaults_when_absent() {
    let result: SearchResult = serde_json::from_value(json!({"data": []})).unwrap();
    assert_eq!(result.pagination().current_page, 1);
    assert_eq!(result.pagination().last_page, 1);
}

#[test]
fn test_pagination_defaults_when_null() {
    let result: SearchResult = serde_json::from_value(json!({
        "data": [],
        "meta": {"pagination": {"current_page": null, "last_page": null}}
    }))
    .unwrap();
    assert_eq!(result.pagination().current_page, 1);
    assert_eq!(result.pagination().last_page, 1);
}

#[test]
fn test_icon_detail_flattens_summary() {
    let detail: IconDetail = serde_json::from_value(json!({
        "id": 7,
        "name": "Sun",
        "slug": "sun_7",
        "created": "2024-01-01",
        "free_svg": true,
        "author": {"id": 1, "name": "Freepik"}
    }))
    .unwrap();

    assert_eq!(detail.icon.id, 7);
    assert_eq!(detail.icon.name, "Sun");
    assert_eq!(detail.free_svg, Some(true));
    assert_eq!(detail.author.unwrap().name, "Freepik");
}

// ============================================================================
// Enum Tests
// ============================================================================

#[test]
fn test_enum_wire_values() {
    assert_eq!(serde_json::to_value(DownloadFormat::Eps).unwrap(), json!("eps"));
    assert_eq!(serde_json::to_value(PngSize::S256).unwrap(), json!(256));
    assert_eq!(serde_json::to_value(SortOrder::Recent).unwrap(), json!("recent"));
    assert_eq!(serde_json::to_value(TaskStatus::Processing).unwrap(), json!("processing"));
}

#[test]
fn test_png_size_rejects_unknown_pixels() {
    assert_eq!(serde_json::from_value::<PngSize>(json!(24)).unwrap(), PngSize::S24);
    assert!(serde_json::from_value::<PngSize>(json!(100)).is_err());
}
