//! JSON files on disk.
//!
//! Every file is written owner-only: directories the store creates are
//! `0700` and files are `0600` on Unix. Writes go through a sibling
//! `.tmp` file and a rename so readers never see a half-written file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StoreError;

const APP_DIR: &str = "picto";
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Locations
// ============================================================================

/// Directory for preferences.
///
/// `~/Library/Application Support/Picto` on macOS, the platform config
/// dir (`~/.config/picto`, `%APPDATA%\picto`) elsewhere.
pub fn default_config_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        return under(dirs::home_dir(), &["Library", "Application Support", "Picto"]);
    }
    under(dirs::config_dir(), &[APP_DIR])
}

/// Directory for favorites and history. Same as the config dir on macOS.
pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        return default_config_dir();
    }
    under(dirs::data_dir(), &[APP_DIR])
}

/// Preferences file.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join(SETTINGS_FILE)
}

/// Joins `parts` onto `base`, or onto the working directory when the
/// platform has no such location.
fn under(base: Option<PathBuf>, parts: &[&str]) -> PathBuf {
    parts
        .iter()
        .fold(base.unwrap_or_else(|| PathBuf::from(".")), |dir, part| {
            dir.join(part)
        })
}

// ============================================================================
// Reading and writing
// ============================================================================

/// Writes `data` as pretty JSON, replacing `path` atomically.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(data)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        private_dir_builder().create(dir).await?;
    }

    let staging = staging_path(path);
    let mut file = private_file_options().open(&staging).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&staging, path).await?;
    debug!(path = %path.display(), bytes = json.len(), "Saved");
    Ok(())
}

/// Reads and decodes a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Like [`load_json`], but falls back to `T::default()`.
///
/// A missing file is the normal first-run case and stays quiet; anything
/// else (corrupt JSON, permissions) is logged.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    load_json(path).await.unwrap_or_else(|e: StoreError| {
        if !e.is_not_found() {
            warn!(path = %path.display(), error = %e, "Unreadable file, using defaults");
        }
        T::default()
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn private_dir_builder() -> tokio::fs::DirBuilder {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder
}

fn private_file_options() -> tokio::fs::OpenOptions {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_in_config_dir() {
        let path = default_settings_path();
        assert!(path.ends_with(SETTINGS_FILE));
        assert_eq!(path.parent(), Some(default_config_dir().as_path()));
    }

    #[test]
    fn test_under_falls_back_to_cwd() {
        assert_eq!(under(None, &["picto"]), PathBuf::from("./picto"));
        assert_eq!(
            under(Some(PathBuf::from("/home/a")), &["Library", "Picto"]),
            PathBuf::from("/home/a/Library/Picto")
        );
    }

    #[test]
    fn test_staging_path_is_sibling() {
        assert_eq!(
            staging_path(Path::new("/data/history.json")),
            PathBuf::from("/data/history.json.tmp")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("settings.json");
        save_json(&path, &serde_json::json!({"a": 1})).await.unwrap();

        let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode & 0o077, 0, "directory must not be group/world accessible");
    }
}
