//! Favorites and recently-used history.
//!
//! Both lists live in JSON files under the data directory. Storage is
//! best-effort: read and write failures are logged and the operation
//! carries on with what it has.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use picto_core::IconSummary;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::persistence::{default_data_dir, load_json_or_default, save_json};

/// Maximum number of history entries kept.
pub const MAX_HISTORY: usize = 100;

const FAVORITES_FILE: &str = "favorites.json";
const HISTORY_FILE: &str = "history.json";

// ============================================================================
// Entries
// ============================================================================

/// A favorited icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteIcon {
    /// The icon as it was when favorited.
    #[serde(flatten)]
    pub icon: IconSummary,
    /// When it was favorited.
    pub added_at: DateTime<Utc>,
}

/// A recently-used icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The icon as it was when used.
    #[serde(flatten)]
    pub icon: IconSummary,
    /// When it was last used.
    pub used_at: DateTime<Utc>,
}

/// Appends a favorite unless one with the same id exists.
fn push_favorite(list: &mut Vec<FavoriteIcon>, icon: &IconSummary, now: DateTime<Utc>) -> bool {
    if list.iter().any(|f| f.icon.id == icon.id) {
        return false;
    }
    list.push(FavoriteIcon {
        icon: icon.clone(),
        added_at: now,
    });
    true
}

/// Moves an icon to the front of the history, evicting the oldest past the cap.
fn record_history(list: &mut Vec<HistoryEntry>, icon: &IconSummary, now: DateTime<Utc>) {
    list.retain(|e| e.icon.id != icon.id);
    list.insert(
        0,
        HistoryEntry {
            icon: icon.clone(),
            used_at: now,
        },
    );
    list.truncate(MAX_HISTORY);
}

// ============================================================================
// Library Store
// ============================================================================

/// Persistent favorites and history.
///
/// Read-modify-write cycles are serialized within one process.
#[derive(Debug)]
pub struct LibraryStore {
    favorites_path: PathBuf,
    history_path: PathBuf,
    lock: Mutex<()>,
}

impl LibraryStore {
    /// Creates a store keeping its files in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            favorites_path: dir.join(FAVORITES_FILE),
            history_path: dir.join(HISTORY_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store in the default data directory.
    pub fn open_default() -> Self {
        Self::new(default_data_dir())
    }

    /// Returns the favorites file path.
    pub fn favorites_path(&self) -> &Path {
        &self.favorites_path
    }

    /// Returns the history file path.
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    // ------------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------------

    /// Returns favorites in the order they were added.
    pub async fn favorites(&self) -> Vec<FavoriteIcon> {
        load_json_or_default(&self.favorites_path).await
    }

    /// Returns true if the icon is a favorite.
    pub async fn is_favorite(&self, id: u64) -> bool {
        self.favorites().await.iter().any(|f| f.icon.id == id)
    }

    /// Adds a favorite. Adding an existing favorite does nothing.
    pub async fn add_favorite(&self, icon: &IconSummary) {
        let _guard = self.lock.lock().await;
        let mut list = self.favorites().await;
        if push_favorite(&mut list, icon, Utc::now()) {
            debug!(id = icon.id, "Favorite added");
            self.write(&self.favorites_path, &list).await;
        }
    }

    /// Removes a favorite by id.
    pub async fn remove_favorite(&self, id: u64) {
        let _guard = self.lock.lock().await;
        let mut list = self.favorites().await;
        let before = list.len();
        list.retain(|f| f.icon.id != id);
        if list.len() != before {
            debug!(id, "Favorite removed");
            self.write(&self.favorites_path, &list).await;
        }
    }

    /// Removes all favorites.
    pub async fn clear_favorites(&self) {
        let _guard = self.lock.lock().await;
        self.write::<FavoriteIcon>(&self.favorites_path, &[]).await;
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    /// Returns history, most recent first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        load_json_or_default(&self.history_path).await
    }

    /// Records an icon as just used.
    pub async fn add_to_history(&self, icon: &IconSummary) {
        let _guard = self.lock.lock().await;
        let mut list = self.history().await;
        record_history(&mut list, icon, Utc::now());
        self.write(&self.history_path, &list).await;
    }

    /// Removes all history.
    pub async fn clear_history(&self) {
        let _guard = self.lock.lock().await;
        self.write::<HistoryEntry>(&self.history_path, &[]).await;
    }

    async fn write<T: Serialize>(&self, path: &Path, list: &[T]) {
        if let Err(e) = save_json(path, &list).await {
            warn!(path = %path.display(), error = %e, "Failed to save library");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
