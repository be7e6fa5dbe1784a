//! User preferences store.
//!
//! Holds the defaults the CLI and other front ends apply when the user does
//! not pass an explicit option.

use std::path::PathBuf;
use std::sync::Arc;

use picto_core::{AiStyle, DownloadFormat, PngSize};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Preferences
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Preferences {
    /// Format for stock icon downloads.
    pub default_format: DownloadFormat,

    /// Size for PNG downloads.
    pub default_png_size: PngSize,

    /// Style for AI generation.
    pub default_ai_style: AiStyle,

    /// Relay base URL. Requests go straight upstream when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent preferences store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    preferences: Arc<RwLock<Preferences>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default preferences.
    pub fn new(path: PathBuf) -> Self {
        Self {
            preferences: Arc::new(RwLock::new(Preferences::default())),
            path,
        }
    }

    /// Loads preferences from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads preferences from a path.
    ///
    /// A missing or unreadable file yields defaults.
    pub async fn load(path: PathBuf) -> Self {
        let preferences = if path.exists() {
            info!(path = %path.display(), "Loading preferences");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load preferences, using defaults");
                Preferences::default()
            })
        } else {
            debug!(path = %path.display(), "Preferences file not found, using defaults");
            Preferences::default()
        };

        Self {
            preferences: Arc::new(RwLock::new(preferences)),
            path,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets a copy of the current preferences.
    pub async fn get(&self) -> Preferences {
        self.preferences.read().await.clone()
    }

    /// Updates preferences in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Preferences),
    {
        let mut preferences = self.preferences.write().await;
        f(&mut preferences);
    }

    /// Saves preferences to disk.
    ///
    /// # Errors
    ///
    /// Returns error if preferences cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let preferences = self.preferences.read().await;
        save_json(&self.path, &*preferences).await?;
        info!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    /// Restores defaults in memory.
    pub async fn reset(&self) {
        *self.preferences.write().await = Preferences::default();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Default download format.
    pub async fn default_format(&self) -> DownloadFormat {
        self.preferences.read().await.default_format
    }

    /// Sets the default download format.
    pub async fn set_default_format(&self, format: DownloadFormat) {
        self.update(|p| p.default_format = format).await;
    }

    /// Default PNG size.
    pub async fn default_png_size(&self) -> PngSize {
        self.preferences.read().await.default_png_size
    }

    /// Sets the default PNG size.
    pub async fn set_default_png_size(&self, size: PngSize) {
        self.update(|p| p.default_png_size = size).await;
    }

    /// Default generation style.
    pub async fn default_ai_style(&self) -> AiStyle {
        self.preferences.read().await.default_ai_style
    }

    /// Sets the default generation style.
    pub async fn set_default_ai_style(&self, style: AiStyle) {
        self.update(|p| p.default_ai_style = style).await;
    }

    /// Relay URL, if configured.
    pub async fn relay_url(&self) -> Option<String> {
        self.preferences.read().await.relay_url.clone()
    }

    /// Sets or clears the relay URL. Blank values clear it.
    pub async fn set_relay_url(&self, url: Option<String>) {
        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self.update(|p| p.relay_url = url).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
