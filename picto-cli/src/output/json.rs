//! JSON output formatting.

use std::collections::HashSet;

use anyhow::Result;
use picto_core::{IconSummary, SearchResult};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// One icon in list output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconOutput {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub favorite: bool,
}

impl IconOutput {
    fn from_summary(icon: &IconSummary, favorite: bool) -> Self {
        Self {
            id: icon.id,
            name: icon.name.clone(),
            slug: icon.slug.clone(),
            style: icon.style.as_ref().map(|s| s.name.clone()),
            family: icon.family.as_ref().map(|f| f.name.clone()),
            thumbnail_url: icon.thumbnail_url().map(str::to_string),
            tags: icon.tag_names().into_iter().map(str::to_string).collect(),
            favorite,
        }
    }
}

/// A page of search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput {
    pub term: String,
    pub page: u32,
    pub last_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub has_next_page: bool,
    pub icons: Vec<IconOutput>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a page of search results.
    pub fn format_search(
        &self,
        term: &str,
        result: &SearchResult,
        favorites: &HashSet<u64>,
    ) -> Result<String> {
        let pagination = result.pagination();
        let output = SearchOutput {
            term: term.to_string(),
            page: pagination.current_page,
            last_page: pagination.last_page,
            total: pagination.total,
            has_next_page: result.has_next_page(),
            icons: result
                .data
                .iter()
                .map(|icon| IconOutput::from_summary(icon, favorites.contains(&icon.id)))
                .collect(),
        };
        self.format(&output)
    }
}
