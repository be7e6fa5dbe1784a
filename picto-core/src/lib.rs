// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Picto Core
//!
//! Core types, models, and traits shared by every Picto crate.
//!
//! This crate has no I/O. It defines:
//!
//! - Domain models for the icon catalogue, downloads, and AI generation
//! - The opaque [`Credential`] attached to upstream requests
//! - Error types
//! - Collaborator traits (document insertion)
//!
//! ## Key Types
//!
//! ### Catalogue
//! - [`SearchQuery`] - Search parameters with wire encoding
//! - [`SearchResult`] - Icons plus pagination metadata
//! - [`IconSummary`] / [`IconDetail`] - Icon metadata
//!
//! ### Downloads
//! - [`DownloadFormat`] / [`PngSize`] - Enumerated download parameters
//! - [`DownloadRequest`] - Query encoding for a download
//! - [`AssetLink`] - Short-lived asset URL
//!
//! ### Generation
//! - [`GenerationRequest`] / [`PreviewRequest`] - Write bodies
//! - [`GenerationTask`] / [`TaskStatus`] - Remote task state
//! - [`GenerationOutcome`] - Ordered result extraction policy

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Credential
    Credential,
    // Catalogue
    IconDetail,
    IconSummary,
    NamedRef,
    Pagination,
    SearchMeta,
    SearchQuery,
    SearchResult,
    SortOrder,
    Tag,
    Thumbnail,
    DEFAULT_PER_PAGE,
    // Downloads
    AssetLink,
    DownloadFormat,
    DownloadRequest,
    PngSize,
    // Generation
    AiFormat,
    AiStyle,
    GeneratedIcon,
    GenerationOutcome,
    GenerationRequest,
    GenerationTask,
    PreviewRequest,
    TaskStatus,
};

// Re-export traits
pub use traits::AssetSink;
