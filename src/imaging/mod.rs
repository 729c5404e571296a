//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Display size** | [`display_dimensions`] over identified size |
//! | **Thumbnail → JPEG** | Lanczos3 + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{display_dimensions, fit_within};
pub use operations::{ThumbnailConfig, create_thumbnail, get_dimensions, get_display_size};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
