//! Root registry and client path resolution.
//!
//! A root is a named base directory from `config.json`. The registry is built
//! once at startup and never changes; request handlers share it read-only.
//!
//! Every client-supplied path goes through [`RootRegistry::resolve`], which
//! joins it onto the root, canonicalizes the result (resolving `..` and
//! symlinks), and refuses anything that lands outside the root's canonical
//! directory.

use crate::config::GalleryConfig;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RootError {
    #[error("Unknown root: {0}")]
    UnknownRoot(String),
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
    #[error("Path {path} escapes root '{root}'")]
    OutsideRoot { root: String, path: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Root name → absolute base directory.
#[derive(Debug, Clone, Default)]
pub struct RootRegistry {
    roots: BTreeMap<String, PathBuf>,
}

/// A client path that resolved inside its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub root: String,
    /// Canonical base directory of the root.
    pub base: PathBuf,
    /// Canonical target path; always starts with `base`.
    pub path: PathBuf,
}

impl ResolvedPath {
    /// Route form (`a/b/c.jpg`) of `child` relative to the root, with each
    /// segment percent-encoded. `child` must live under `base` and have
    /// UTF-8 components; listings drop entries that don't.
    pub fn route_of(&self, child: &Path) -> String {
        route_segments(child.strip_prefix(&self.base).unwrap_or(child))
    }
}

impl RootRegistry {
    /// Build a registry from the configured `base_dirs`, making every path
    /// absolute against the current working directory.
    pub fn from_config(config: &GalleryConfig) -> std::io::Result<Self> {
        let mut roots = BTreeMap::new();
        for (name, dir) in &config.base_dirs {
            roots.insert(name.clone(), std::path::absolute(dir)?);
        }
        Ok(Self { roots })
    }

    /// Build a registry from already-absolute paths.
    pub fn new(roots: BTreeMap<String, PathBuf>) -> Self {
        Self { roots }
    }

    /// Iterate roots in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.roots.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Absolute base directory of a root.
    pub fn base(&self, name: &str) -> Result<&Path, RootError> {
        self.roots
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| RootError::UnknownRoot(name.to_string()))
    }

    /// Resolve `relative` (or the root itself when `None`) inside root `name`.
    pub fn resolve(&self, name: &str, relative: Option<&str>) -> Result<ResolvedPath, RootError> {
        let base = canonicalize(self.base(name)?)?;
        let path = match relative {
            Some(rel) => canonicalize(&base.join(rel))?,
            None => base.clone(),
        };

        if !path.starts_with(&base) {
            tracing::warn!(
                "Path traversal attempt: {:?} in root '{}' resolved to {}",
                relative,
                name,
                path.display()
            );
            return Err(RootError::OutsideRoot {
                root: name.to_string(),
                path,
            });
        }

        Ok(ResolvedPath {
            root: name.to_string(),
            base,
            path,
        })
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, RootError> {
    path.canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound => RootError::NotFound(path.to_path_buf()),
        _ => RootError::Io(e),
    })
}

/// Join the normal components of a relative path with `/`, percent-encoding
/// each one.
fn route_segments(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(urlencoding::encode(&s.to_string_lossy()).into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry_for(tmp: &TempDir) -> RootRegistry {
        RootRegistry::new(BTreeMap::from([(
            "photos".to_string(),
            tmp.path().join("photos"),
        )]))
    }

    fn setup() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("photos/trips/2024")).unwrap();
        fs::write(tmp.path().join("photos/trips/a.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("secret.txt"), b"s").unwrap();
        tmp
    }

    #[test]
    fn base_of_unknown_root_errors() {
        let registry = RootRegistry::default();
        assert!(matches!(
            registry.base("nope"),
            Err(RootError::UnknownRoot(name)) if name == "nope"
        ));
    }

    #[test]
    fn from_config_makes_paths_absolute() {
        let config = GalleryConfig::default();
        let registry = RootRegistry::from_config(&config).unwrap();
        let base = registry.base("default").unwrap();
        assert!(base.is_absolute());
        assert!(base.ends_with("static"));
    }

    #[test]
    fn iter_is_name_ordered() {
        let registry = RootRegistry::new(BTreeMap::from([
            ("zeta".to_string(), PathBuf::from("/z")),
            ("alpha".to_string(), PathBuf::from("/a")),
        ]));
        let names: Vec<&str> = registry.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn resolve_root_itself() {
        let tmp = setup();
        let resolved = registry_for(&tmp).resolve("photos", None).unwrap();
        assert_eq!(resolved.path, resolved.base);
        assert_eq!(resolved.root, "photos");
    }

    #[test]
    fn resolve_nested_file() {
        let tmp = setup();
        let resolved = registry_for(&tmp)
            .resolve("photos", Some("trips/a.jpg"))
            .unwrap();
        assert!(resolved.path.ends_with("trips/a.jpg"));
        assert_eq!(resolved.route_of(&resolved.path), "trips/a.jpg");
    }

    #[test]
    fn resolve_dotdot_inside_root_is_allowed() {
        let tmp = setup();
        let resolved = registry_for(&tmp)
            .resolve("photos", Some("trips/2024/../a.jpg"))
            .unwrap();
        assert!(resolved.path.ends_with("trips/a.jpg"));
    }

    #[test]
    fn resolve_traversal_is_rejected() {
        let tmp = setup();
        let result = registry_for(&tmp).resolve("photos", Some("../secret.txt"));
        assert!(matches!(result, Err(RootError::OutsideRoot { .. })));
    }

    #[test]
    fn resolve_absolute_path_is_rejected() {
        let tmp = setup();
        let outside = tmp.path().join("secret.txt");
        let result = registry_for(&tmp).resolve("photos", Some(outside.to_str().unwrap()));
        assert!(matches!(result, Err(RootError::OutsideRoot { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_symlink_escape_is_rejected() {
        let tmp = setup();
        std::os::unix::fs::symlink(
            tmp.path().join("secret.txt"),
            tmp.path().join("photos/link.txt"),
        )
        .unwrap();
        let result = registry_for(&tmp).resolve("photos", Some("link.txt"));
        assert!(matches!(result, Err(RootError::OutsideRoot { .. })));
    }

    #[test]
    fn resolve_missing_path_is_not_found() {
        let tmp = setup();
        let result = registry_for(&tmp).resolve("photos", Some("trips/nope.jpg"));
        assert!(matches!(result, Err(RootError::NotFound(_))));
    }

    #[test]
    fn resolve_missing_base_is_not_found() {
        let registry = RootRegistry::new(BTreeMap::from([(
            "gone".to_string(),
            PathBuf::from("/definitely/not/here"),
        )]));
        assert!(matches!(
            registry.resolve("gone", None),
            Err(RootError::NotFound(_))
        ));
    }

    #[test]
    fn route_segments_are_percent_encoded() {
        assert_eq!(
            route_segments(Path::new("summer trip/#1 beach.jpg")),
            "summer%20trip/%231%20beach.jpg"
        );
    }
}
