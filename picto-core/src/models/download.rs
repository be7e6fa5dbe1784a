//! Download parameters and asset links.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Download Format
// ============================================================================

/// File format for a stock icon download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    /// Scalable vector graphic.
    Svg,
    /// Raster PNG; the only format that takes a size.
    #[default]
    Png,
    /// Animated GIF.
    Gif,
    /// MP4 video.
    Mp4,
    /// After Effects project.
    Aep,
    /// Lottie JSON.
    Json,
    /// Photoshop document.
    Psd,
    /// Encapsulated PostScript.
    Eps,
}

impl DownloadFormat {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Mp4 => "mp4",
            Self::Aep => "aep",
            Self::Json => "json",
            Self::Psd => "psd",
            Self::Eps => "eps",
        }
    }

    /// All formats, in upstream order.
    pub fn all() -> &'static [DownloadFormat] {
        &[
            Self::Svg,
            Self::Png,
            Self::Gif,
            Self::Mp4,
            Self::Aep,
            Self::Json,
            Self::Psd,
            Self::Eps,
        ]
    }

    /// Returns true if the format takes a [`PngSize`].
    pub fn takes_size(&self) -> bool {
        matches!(self, Self::Png)
    }
}

impl fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "unknown download format '{s}' (expected one of svg, png, gif, mp4, aep, json, psd, eps)"
                ))
            })
    }
}

// ============================================================================
// PNG Size
// ============================================================================

/// Pixel size for PNG downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum PngSize {
    /// 512 px.
    S512,
    /// 256 px.
    S256,
    /// 128 px.
    #[default]
    S128,
    /// 64 px.
    S64,
    /// 32 px.
    S32,
    /// 24 px.
    S24,
    /// 16 px.
    S16,
}

impl PngSize {
    /// Returns the size in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            Self::S512 => 512,
            Self::S256 => 256,
            Self::S128 => 128,
            Self::S64 => 64,
            Self::S32 => 32,
            Self::S24 => 24,
            Self::S16 => 16,
        }
    }

    /// All sizes, largest first.
    pub fn all() -> &'static [PngSize] {
        &[
            Self::S512,
            Self::S256,
            Self::S128,
            Self::S64,
            Self::S32,
            Self::S24,
            Self::S16,
        ]
    }
}

impl TryFrom<u32> for PngSize {
    type Error = CoreError;

    fn try_from(pixels: u32) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.pixels() == pixels)
            .ok_or_else(|| {
                CoreError::InvalidParameter(format!(
                    "unsupported PNG size {pixels} (expected one of 512, 256, 128, 64, 32, 24, 16)"
                ))
            })
    }
}

impl From<PngSize> for u32 {
    fn from(size: PngSize) -> Self {
        size.pixels()
    }
}

impl fmt::Display for PngSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

impl FromStr for PngSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pixels: u32 = s
            .trim()
            .trim_end_matches("px")
            .parse()
            .map_err(|_| CoreError::InvalidParameter(format!("invalid PNG size '{s}'")))?;
        Self::try_from(pixels)
    }
}

// ============================================================================
// Download Request
// ============================================================================

/// A stock icon download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Icon to download.
    pub icon_id: u64,
    /// Target format.
    pub format: DownloadFormat,
    /// PNG size; ignored for every other format.
    pub png_size: Option<PngSize>,
}

impl DownloadRequest {
    /// Creates a download request.
    pub fn new(icon_id: u64, format: DownloadFormat, png_size: Option<PngSize>) -> Self {
        Self {
            icon_id,
            format,
            png_size,
        }
    }

    /// Encodes the request as upstream query parameters.
    ///
    /// `png_size` is only emitted for PNG downloads.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("format", self.format.as_str().to_string())];
        if self.format.takes_size() {
            if let Some(size) = self.png_size {
                pairs.push(("png_size", size.pixels().to_string()));
            }
        }
        pairs
    }
}

// ============================================================================
// Asset Link
// ============================================================================

/// A short-lived URL to a downloadable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLink {
    /// Asset URL.
    pub url: String,
    /// Suggested file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_size_only_for_png() {
        for format in DownloadFormat::all() {
            let pairs = DownloadRequest::new(42, *format, Some(PngSize::S64)).query_pairs();
            let has_size = pairs.iter().any(|(k, _)| *k == "png_size");
            assert_eq!(has_size, *format == DownloadFormat::Png, "format {format}");
        }
    }

    #[test]
    fn test_png_without_size() {
        let pairs = DownloadRequest::new(42, DownloadFormat::Png, None).query_pairs();
        assert_eq!(pairs, vec![("format", "png".to_string())]);
    }

    #[test]
    fn test_png_size_parse() {
        assert_eq!("64".parse::<PngSize>().unwrap(), PngSize::S64);
        assert_eq!("512px".parse::<PngSize>().unwrap(), PngSize::S512);
        assert!("100".parse::<PngSize>().is_err());
        assert!("big".parse::<PngSize>().is_err());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("SVG".parse::<DownloadFormat>().unwrap(), DownloadFormat::Svg);
        assert!("webp".parse::<DownloadFormat>().is_err());
    }
}
