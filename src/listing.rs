//! Directory listing and grid layout.
//!
//! Turns one directory of a root into the view model of a gallery page:
//! a list of navigable folders and a row-major grid of images, each image
//! carrying the size it should occupy on the page.
//!
//! ## Rules
//!
//! - Only the immediate children of the directory are read (no recursion).
//!   Files and directories are told apart by filesystem metadata.
//! - An optional regex filter keeps files whose *name* contains a match.
//!   Directories are never filtered.
//! - Files and directories are each sorted by full path.
//! - Subdirectory listings start with a `..` folder linking one level up.
//! - Only names ending in `.jpg` or `.png` (lowercase) become grid images.
//! - Image sizes come from file headers; an unreadable image is skipped with
//!   a warning instead of failing the whole page.
//! - Symlinks are followed only when their target stays inside the root.
//!   Entries with non UTF-8 names are left out, as no route can name them.

use crate::config::DisplayConfig;
use crate::imaging::{ImageBackend, get_display_size};
use crate::roots::{ResolvedPath, RootError, RootRegistry};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Filename suffixes that are shown in the grid. Matching is case-sensitive.
pub const LISTED_IMAGE_SUFFIXES: &[&str] = &[".jpg", ".png"];

#[derive(Error, Debug)]
pub enum ListingError {
    #[error(transparent)]
    Root(#[from] RootError),
    #[error("Invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A navigable folder link. `path` is a route, not a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
}

/// An image cell in the gallery grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub name: String,
    /// Route of the original image.
    pub src: String,
    /// Display width, fitted to the display box.
    pub width: u32,
    /// Display height, fitted to the display box.
    pub height: u32,
}

/// Row-major image rows; every row but the last is full.
pub type Grid = Vec<Vec<ImageEntry>>;

/// Everything a gallery page needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub images: Grid,
    pub cols: usize,
    pub folders: Vec<FolderEntry>,
}

/// Compile the `filter` query parameter. `None` means no filtering.
pub fn compile_filter(pattern: Option<&str>) -> Result<Option<Regex>, ListingError> {
    pattern.map(Regex::new).transpose().map_err(Into::into)
}

/// One folder entry per registered root, in registry order.
pub fn home_folders(registry: &RootRegistry) -> Vec<FolderEntry> {
    registry
        .iter()
        .map(|(name, _)| FolderEntry {
            name: name.to_string(),
            path: format!("/dir/{}", urlencoding::encode(name)),
        })
        .collect()
}

/// List `subdir` of `root` (or the root itself) as a gallery.
pub fn list_directory(
    registry: &RootRegistry,
    backend: &impl ImageBackend,
    display: &DisplayConfig,
    root: &str,
    subdir: Option<&str>,
    filter: Option<&Regex>,
) -> Result<Gallery, ListingError> {
    let subdir = subdir.filter(|s| !s.trim_matches('/').is_empty());
    let resolved = registry.resolve(root, subdir)?;
    if !resolved.path.is_dir() {
        return Err(ListingError::NotADirectory(resolved.path));
    }

    let (mut files, mut dirs) = collect_entries(&resolved.path, &resolved.base)?;
    if let Some(re) = filter {
        files.retain(|f| re.is_match(&file_name(f)));
    }
    files.sort();
    dirs.sort();

    let mut folders = Vec::with_capacity(dirs.len() + 1);
    if subdir.is_some() {
        folders.push(FolderEntry {
            name: "..".to_string(),
            path: "..".to_string(),
        });
    }
    folders.extend(dirs.iter().map(|d| FolderEntry {
        name: file_name(d),
        path: format!("/dir/{}/{}", urlencoding::encode(root), resolved.route_of(d)),
    }));

    let images: Vec<ImageEntry> = files
        .iter()
        .filter(|f| is_listed_image(&file_name(f)))
        .filter_map(|f| image_entry(backend, display, &resolved, f))
        .collect();

    debug!(
        "Listed {} in root '{}': {} images, {} folders",
        resolved.path.display(),
        root,
        images.len(),
        dirs.len()
    );

    Ok(Gallery {
        images: pack_rows(images, display.columns),
        cols: display.columns,
        folders,
    })
}

/// Pack items left-to-right, top-to-bottom into rows of `columns`.
pub fn pack_rows<T>(items: Vec<T>, columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut rows: Vec<Vec<T>> = Vec::with_capacity(items.len().div_ceil(columns));
    for item in items {
        match rows.last_mut() {
            Some(row) if row.len() < columns => row.push(item),
            _ => rows.push(vec![item]),
        }
    }
    rows
}

fn image_entry(
    backend: &impl ImageBackend,
    display: &DisplayConfig,
    resolved: &ResolvedPath,
    path: &Path,
) -> Option<ImageEntry> {
    match get_display_size(backend, path, display.bounding_box()) {
        Ok((width, height)) => Some(ImageEntry {
            name: file_name(path),
            src: format!(
                "/img/{}/{}",
                urlencoding::encode(&resolved.root),
                resolved.route_of(path)
            ),
            width,
            height,
        }),
        Err(e) => {
            warn!("Skipping unreadable image {}: {}", path.display(), e);
            None
        }
    }
}

/// Immediate children split into (files, directories).
///
/// Entries are classified by their canonical target. Anything that is
/// neither a file nor a directory (dangling symlinks), resolves outside
/// `base`, or has a name that is not valid UTF-8 is dropped, since no route
/// could reach it.
fn collect_entries(
    dir: &Path,
    base: &Path,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ListingError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.file_name().and_then(|n| n.to_str()).is_none() {
            warn!("Skipping entry with non UTF-8 name: {}", path.display());
            continue;
        }
        let Ok(target) = path.canonicalize() else {
            debug!("Skipping dangling entry {}", path.display());
            continue;
        };
        if !target.starts_with(base) {
            warn!(
                "Skipping {}: links outside the root to {}",
                path.display(),
                target.display()
            );
            continue;
        }
        if target.is_file() {
            files.push(path);
        } else if target.is_dir() {
            dirs.push(path);
        }
    }
    Ok((files, dirs))
}

fn is_listed_image(name: &str) -> bool {
    LISTED_IMAGE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
