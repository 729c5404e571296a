//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the server needs:
//! `identify` (header-only dimensions, used by directory listings) and
//! `thumbnail` (decode, shrink to fit, re-encode as JPEG, used by the image
//! endpoint).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Request handlers hold it behind an `Arc` and call it from blocking
//! worker threads, so implementations must be `Send + Sync` and must not share
//! decode buffers between calls.

use super::params::ThumbnailParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An encoded image held in memory, ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Trait for image processing backends.
pub trait ImageBackend: Send + Sync {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, shrink to fit the box (never enlarge), and encode as JPEG.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<EncodedImage, BackendError>;
}
