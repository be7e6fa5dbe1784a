//! Writing fetched assets to disk.

use std::path::{Path, PathBuf};

use picto_client::{AssetFetcher, FetchedAsset};
use picto_core::{AssetSink, CoreError};
use tracing::{debug, info};

/// Asset sink that saves each asset to a file.
pub struct FileSink {
    fetcher: AssetFetcher,
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink writing to `path`.
    pub fn new(fetcher: AssetFetcher, path: PathBuf) -> Self {
        Self { fetcher, path }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSink for FileSink {
    async fn insert_asset(&self, url: &str) -> Result<(), CoreError> {
        let asset = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| CoreError::Sink(e.to_string()))?;
        write_asset(&self.path, &asset).await?;
        info!(path = %self.path.display(), size = asset.bytes.len(), "Asset saved");
        Ok(())
    }
}

async fn write_asset(path: &Path, asset: &FetchedAsset) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CoreError::Sink(format!("cannot create {}: {e}", parent.display())))?;
    }
    tokio::fs::write(path, &asset.bytes)
        .await
        .map_err(|e| CoreError::Sink(format!("cannot write {}: {e}", path.display())))?;
    debug!(path = %path.display(), "Asset written");
    Ok(())
}

/// Picks the output path.
///
/// An explicit path is used as-is unless it is an existing directory, in
/// which case `filename` is placed inside it.
pub fn output_path(explicit: Option<&Path>, filename: &str) -> PathBuf {
    match explicit {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename),
    }
}

/// Reduces an upstream file name to a safe base name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "icon".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(Some(dir.path()), "camera.png");
        assert_eq!(path, dir.path().join("camera.png"));
    }

    #[test]
    fn test_output_path_defaults_to_filename() {
        assert_eq!(output_path(None, "camera.png"), PathBuf::from("camera.png"));
        assert_eq!(
            output_path(Some(Path::new("out/x.svg")), "camera.png"),
            PathBuf::from("out/x.svg")
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my icon?.png"), "my_icon_.png");
        assert_eq!(sanitize_filename(".."), "icon");
    }

    #[tokio::test]
    async fn test_write_asset_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("icon.svg");
        let asset = FetchedAsset {
            bytes: b"<svg/>".to_vec(),
            content_type: Some("image/svg+xml".to_string()),
        };

        write_asset(&path, &asset).await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"<svg/>");
    }
}
