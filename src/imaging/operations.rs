//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, EncodedImage, ImageBackend};
use super::calculations::display_dimensions;
use super::params::{Quality, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Compute the grid display size of an image from its header dimensions.
///
/// No pixel data is decoded; only the header is read.
pub fn get_display_size(
    backend: &impl ImageBackend,
    path: &Path,
    display_box: (u32, u32),
) -> Result<(u32, u32)> {
    let source = get_dimensions(backend, path)?;
    Ok(display_dimensions(source, display_box))
}

/// Configuration for on-demand thumbnail generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailConfig {
    pub quality: Quality,
}

/// Create a JPEG thumbnail of `source` fitting inside `max_width × max_height`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    max_width: u32,
    max_height: u32,
    config: &ThumbnailConfig,
) -> Result<EncodedImage> {
    backend.thumbnail(&ThumbnailParams {
        source: source.to_path_buf(),
        max_width,
        max_height,
        quality: config.quality,
    })
}
