//! Shared test utilities for the live-gal test suite.
//!
//! Provides synthetic image writers, a small on-disk gallery fixture, and
//! extractors that flatten listing results into names for compact asserts.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_gallery();
//! let registry = registry_for(tmp.path());
//! // ... list "photos" and assert on grid_names / folder_names
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

use crate::listing::Gallery;
use crate::roots::RootRegistry;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a small valid JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a small valid PNG with an alpha channel.
pub fn create_test_rgba_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, 64, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a gallery tree in a temp directory:
///
/// ```text
/// photos/
/// ├── a.jpg            1000x500
/// ├── b.png            200x400
/// ├── c.jpg            300x300
/// ├── UPPER.JPG        (not listed: uppercase extension)
/// ├── notes.txt
/// ├── alpha/
/// │   ├── one.jpg      640x480
/// │   └── nested/
/// │       └── deep.jpg 50x50
/// └── beta/            (empty)
/// ```
pub fn setup_gallery() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let photos = tmp.path().join("photos");
    std::fs::create_dir_all(photos.join("alpha/nested")).unwrap();
    std::fs::create_dir_all(photos.join("beta")).unwrap();

    create_test_jpeg(&photos.join("a.jpg"), 1000, 500);
    create_test_rgba_png(&photos.join("b.png"), 200, 400);
    create_test_jpeg(&photos.join("c.jpg"), 300, 300);
    create_test_jpeg(&photos.join("UPPER.JPG"), 10, 10);
    std::fs::write(photos.join("notes.txt"), "not an image").unwrap();
    create_test_jpeg(&photos.join("alpha/one.jpg"), 640, 480);
    create_test_jpeg(&photos.join("alpha/nested/deep.jpg"), 50, 50);
    tmp
}

/// Registry with a single root named `photos` at `<dir>/photos`.
pub fn registry_for(dir: &Path) -> RootRegistry {
    RootRegistry::new(BTreeMap::from([(
        "photos".to_string(),
        dir.join("photos"),
    )]))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Image names per grid row.
pub fn grid_names(gallery: &Gallery) -> Vec<Vec<String>> {
    gallery
        .images
        .iter()
        .map(|row| row.iter().map(|i| i.name.clone()).collect())
        .collect()
}

/// Folder names in display order.
pub fn folder_names(gallery: &Gallery) -> Vec<String> {
    gallery.folders.iter().map(|f| f.name.clone()).collect()
}
