//! Domain models for Picto.
//!
//! ## Submodules
//!
//! - [`credential`] - The opaque API credential
//! - [`icon`] - Catalogue types (SearchQuery, SearchResult, IconSummary)
//! - [`download`] - Download parameters and asset links
//! - [`generation`] - AI generation requests, tasks, and result extraction

mod credential;
mod download;
mod generation;
mod icon;

// Re-export everything at the models level
pub use credential::Credential;
pub use download::{AssetLink, DownloadFormat, DownloadRequest, PngSize};
pub use generation::{
    AiFormat, AiStyle, GeneratedIcon, GenerationOutcome, GenerationRequest, GenerationTask,
    PreviewRequest, TaskStatus,
};
pub use icon::{
    DEFAULT_PER_PAGE, IconDetail, IconSummary, NamedRef, Pagination, SearchMeta, SearchQuery,
    SearchResult, SortOrder, Tag, Thumbnail,
};
#[cfg(test)]
mod serde_tests;
