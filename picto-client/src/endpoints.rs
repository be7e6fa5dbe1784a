//! Upstream endpoint paths, relative to the API base URL.

use picto_core::AiFormat;

/// Catalogue search.
pub const ICON_SEARCH: &str = "/icons";

/// Full generation.
pub const AI_GENERATE: &str = "/ai/text-to-icon";

/// Preview generation.
pub const AI_PREVIEW: &str = "/ai/text-to-icon/preview";

/// Single icon detail.
pub fn icon(id: u64) -> String {
    format!("/icons/{id}")
}

/// Stock icon download link.
pub fn icon_download(id: u64) -> String {
    format!("/icons/{id}/download")
}

/// Generation task status.
pub fn ai_status(task_id: &str) -> String {
    format!("/ai/text-to-icon/status/{}", encode_segment(task_id))
}

/// Generated icon render in a given format.
pub fn ai_render(task_id: &str, format: AiFormat) -> String {
    format!(
        "/ai/text-to-icon/{}/render/{}",
        encode_segment(task_id),
        format.as_str()
    )
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(icon(42), "/icons/42");
        assert_eq!(icon_download(42), "/icons/42/download");
        assert_eq!(ai_status("T1"), "/ai/text-to-icon/status/T1");
        assert_eq!(
            ai_render("T1", AiFormat::Svg),
            "/ai/text-to-icon/T1/render/svg"
        );
    }

    #[test]
    fn test_task_id_cannot_escape_segment() {
        assert_eq!(ai_status("../x"), "/ai/text-to-icon/status/..%2Fx");
    }
}
