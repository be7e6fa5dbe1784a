//! Trait definitions for Picto.
//!
//! This module defines the contracts the core needs from external
//! collaborators.

use crate::error::CoreError;

/// Destination for a resolved asset, such as the active document.
///
/// Implementors receive a short-lived asset URL (a download link or a
/// generated icon URL) and are responsible for fetching and placing it.
pub trait AssetSink: Send + Sync {
    /// Inserts the asset behind `url`.
    fn insert_asset(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<(), CoreError>> + Send;
}
