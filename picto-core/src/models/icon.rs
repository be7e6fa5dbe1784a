//! Icon catalogue types.
//!
//! This module contains the search side of the upstream API:
//! - [`SearchQuery`] - Parameters and their wire encoding
//! - [`SearchResult`] - Result envelope with pagination
//! - [`IconSummary`] - One icon as listed in search results

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Page size sent when the caller does not choose one.
pub const DEFAULT_PER_PAGE: u32 = 20;

// ============================================================================
// Search Query
// ============================================================================

/// Sort order for icon search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Best match first.
    #[default]
    Relevance,
    /// Newest first.
    Recent,
}

impl SortOrder {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Recent => "recent",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "recent" => Ok(Self::Recent),
            other => Err(CoreError::InvalidParameter(format!(
                "unknown sort order '{other}' (expected relevance or recent)"
            ))),
        }
    }
}

/// Parameters for an icon search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Search term. Required and non-empty.
    pub term: String,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size; [`DEFAULT_PER_PAGE`] when absent.
    pub per_page: Option<u32>,
    /// Restrict to one icon family.
    pub family_id: Option<String>,
    /// Sort order.
    pub order: Option<SortOrder>,
    /// Thumbnail size in pixels.
    pub thumbnail_size: Option<u32>,
    /// Restrict to an icon slug.
    pub slug: Option<String>,
    /// Arbitrary filters, sent as `filters[<key>]=<value>`.
    pub filters: BTreeMap<String, String>,
}

impl SearchQuery {
    /// Creates a query for a search term.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Sets the page number.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Restricts results to a family.
    #[must_use]
    pub fn family_id(mut self, family_id: impl Into<String>) -> Self {
        self.family_id = Some(family_id.into());
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the thumbnail size.
    #[must_use]
    pub fn thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = Some(size);
        self
    }

    /// Restricts results to a slug.
    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Returns the effective page size.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Checks the caller contract: non-empty term, page and page size >= 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.term.trim().is_empty() {
            return Err(CoreError::InvalidParameter(
                "search term must not be empty".to_string(),
            ));
        }
        if self.page == Some(0) {
            return Err(CoreError::InvalidParameter("page starts at 1".to_string()));
        }
        if self.per_page == Some(0) {
            return Err(CoreError::InvalidParameter(
                "per_page must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Encodes the query as upstream query parameters.
    ///
    /// `per_page` is always present.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("term".to_string(), self.term.clone())];

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.push(("per_page".to_string(), self.effective_per_page().to_string()));
        if let Some(family_id) = &self.family_id {
            pairs.push(("family-id".to_string(), family_id.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(size) = self.thumbnail_size {
            pairs.push(("thumbnail_size".to_string(), size.to_string()));
        }
        if let Some(slug) = &self.slug {
            pairs.push(("slug".to_string(), slug.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((format!("filters[{key}]"), value.clone()));
        }

        pairs
    }
}

// ============================================================================
// Search Result
// ============================================================================

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    /// Icons on this page, in upstream order.
    #[serde(default)]
    pub data: Vec<IconSummary>,
    /// Pagination metadata.
    #[serde(default)]
    pub meta: SearchMeta,
}

impl SearchResult {
    /// Returns the pagination metadata.
    pub fn pagination(&self) -> &Pagination {
        &self.meta.pagination
    }

    /// Returns true if there is a page after this one.
    pub fn has_next_page(&self) -> bool {
        self.meta.pagination.current_page < self.meta.pagination.last_page
    }
}

/// Metadata block of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchMeta {
    /// Pagination details.
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination details. Page numbers default to 1 when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page.
    #[serde(default = "first_page", deserialize_with = "page_or_first")]
    pub current_page: u32,
    /// Last available page.
    #[serde(default = "first_page", deserialize_with = "page_or_first")]
    pub last_page: u32,
    /// Page size reported upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Total matching icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            per_page: None,
            total: None,
        }
    }
}

fn first_page() -> u32 {
    1
}

fn page_or_first<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1))
}

// ============================================================================
// Icons
// ============================================================================

/// One icon as listed in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSummary {
    /// Unique icon identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Preview images, in upstream order.
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    /// Drawing style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NamedRef>,
    /// Icon family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<NamedRef>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl IconSummary {
    /// Returns the first thumbnail URL, if any.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnails.first().map(|t| t.url.as_str())
    }

    /// Returns tag names.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Full metadata for one icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconDetail {
    /// Fields shared with search results.
    #[serde(flatten)]
    pub icon: IconSummary,
    /// Creation date as reported upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Whether the SVG is free to download.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_svg: Option<bool>,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
}

/// A preview image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Image URL.
    pub url: String,
}

/// A reference to a named upstream entity (style, family, author).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// An icon tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
