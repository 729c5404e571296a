//! # Live Gal
//!
//! A small HTTP image gallery. Point it at one or more directories and browse
//! them: every folder becomes a page with its subfolders and a grid of
//! images, and thumbnails are produced on demand from the originals.
//!
//! # Request Flow
//!
//! ```text
//! GET /dir/<root>/<subdir>/   →  listing  →  render   (HTML gallery page)
//! GET /img/<root>/<file>?w&h  →  imaging              (JPEG thumbnail)
//! GET /img/<root>/<file>      →  original file, streamed unchanged
//! ```
//!
//! Nothing is cached or persisted. Each request reads the live filesystem, so
//! adding a photo to a directory shows up on the next page load.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.json` loading, defaults, and validation |
//! | [`roots`] | Named root directories; confines client paths to their root |
//! | [`imaging`] | Dimension math, the image backend, JPEG thumbnails |
//! | [`listing`] | Directory listing, regex filtering, grid packing |
//! | [`render`] | Maud HTML for the home, gallery, and error pages |
//! | [`server`] | axum router, handlers, and error → status mapping |
//!
//! # Design Decisions
//!
//! ## Header-Only Sizing for Listings
//!
//! Gallery pages need every image's aspect ratio to lay out the grid. Reading
//! only the file header (no pixel decode) keeps large directories fast; the
//! decode cost is paid later, per thumbnail, by the browser's `<img>` requests.
//!
//! ## Confined Paths
//!
//! Client paths are joined onto the root and canonicalized before use. Anything
//! resolving outside the root, through `..` or a symlink, is refused with 403.
//!
//! ## Skipping Unreadable Images
//!
//! A corrupt or truncated `.jpg`/`.png` in a directory is logged and left out
//! of the grid rather than failing the whole page.

pub mod config;
pub mod imaging;
pub mod listing;
pub mod render;
pub mod roots;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
