//! Gallery configuration module.
//!
//! Handles loading and validating `config.json`. The file names the
//! directories exposed for browsing and, optionally, the grid layout and
//! thumbnail settings.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "base_dirs": {
//!     "photos": "/srv/photos",
//!     "scans": "./scans"
//!   },
//!   "display": { "width": 500, "height": 400, "columns": 2 },
//!   "thumbnails": { "quality": 75 }
//! }
//! ```
//!
//! - `base_dirs` (required): root name → directory. Relative paths are
//!   resolved against the working directory at startup.
//! - `display` (optional): bounding box for images in the gallery grid, and
//!   the number of grid columns.
//! - `thumbnails` (optional): JPEG quality for on-demand thumbnails.
//!
//! ## Missing Config
//!
//! When `config.json` does not exist the server still starts, exposing a
//! single root named `default` that points at `./static`.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root name used when no config file is present.
pub const DEFAULT_ROOT_NAME: &str = "default";
/// Directory served by the fallback root.
pub const DEFAULT_ROOT_DIR: &str = "static";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryConfig {
    /// Root name → base directory, as written in the file.
    pub base_dirs: BTreeMap<String, PathBuf>,
    /// Gallery grid layout.
    #[serde(default)]
    pub display: DisplayConfig,
    /// On-demand thumbnail settings.
    #[serde(default)]
    pub thumbnails: ThumbnailsConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_dirs: BTreeMap::from([(
                DEFAULT_ROOT_NAME.to_string(),
                PathBuf::from(DEFAULT_ROOT_DIR),
            )]),
            display: DisplayConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_dirs.is_empty() {
            return Err(ConfigError::Validation(
                "base_dirs must name at least one directory".into(),
            ));
        }
        for name in self.base_dirs.keys() {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "base_dirs key {name:?} must be non-empty and contain no '/'"
                )));
            }
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Validation(
                "display.width and display.height must be non-zero".into(),
            ));
        }
        if self.display.columns == 0 {
            return Err(ConfigError::Validation(
                "display.columns must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Gallery grid layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Maximum on-page width of an image in the grid.
    pub width: u32,
    /// Maximum on-page height of an image in the grid.
    pub height: u32,
    /// Images per grid row.
    pub columns: usize,
}

impl DisplayConfig {
    pub fn bounding_box(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 400,
            columns: 2,
        }
    }
}

/// On-demand thumbnail settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { quality: 75 }
    }
}

/// Load and validate the config file at `path`.
///
/// A missing file yields [`GalleryConfig::default`]. Any other read failure,
/// malformed JSON, or an invalid value is an error.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                "No config at {}, serving ./{} as '{}'",
                path.display(),
                DEFAULT_ROOT_DIR,
                DEFAULT_ROOT_NAME
            );
            return Ok(GalleryConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: GalleryConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a sample `config.json` with every option set to its default.
///
/// Used by the `gen-config` CLI command.
pub fn sample_config_json() -> &'static str {
    r#"{
  "base_dirs": {
    "photos": "/srv/photos",
    "scans": "./scans"
  },
  "display": {
    "width": 500,
    "height": 400,
    "columns": 2
  },
  "thumbnails": {
    "quality": 75
  }
}
"#
}
