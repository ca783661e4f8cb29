//! Controller existence checks used by rewrite-mode parsing.
//!
//! The router never loads controllers; it only asks a [`ControllerResolver`]
//! whether a controller path names a leaf (a controller file) or a directory
//! of further controllers. Paths are `/`-separated and relative to the
//! controller root, e.g. `"admin/user"`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use waypoint_core::ControllerSettings;

/// Answers whether controller paths exist.
pub trait ControllerResolver: Send + Sync {
    /// Returns `true` if `path` names a controller.
    fn exists(&self, path: &str) -> bool;

    /// Returns `true` if `path` names a directory of controllers.
    fn is_directory(&self, path: &str) -> bool;
}

/// Resolves controllers as files under a root directory.
///
/// Controller `admin/user` exists when `<root>/admin/user.<ext>` is a file.
/// Paths containing empty, `.` or `..` components are rejected outright so a
/// request path can never probe outside the root.
#[derive(Debug, Clone)]
pub struct FsControllerResolver {
    root: PathBuf,
    file_extension: String,
}

impl FsControllerResolver {
    /// Creates a resolver rooted at `root` that looks for `*.{file_extension}` files.
    pub fn new(root: impl Into<PathBuf>, file_extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_extension: file_extension.into(),
        }
    }

    /// Creates a resolver from [`ControllerSettings`].
    pub fn from_settings(settings: &ControllerSettings) -> Self {
        Self::new(settings.dir.clone(), settings.file_extension.clone())
    }

    /// Returns the controller root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative(&self, path: &str) -> Option<PathBuf> {
        let safe = !path.is_empty()
            && path
                .split('/')
                .all(|c| !c.is_empty() && c != "." && c != ".." && !c.contains('\\'));
        safe.then(|| self.root.join(path))
    }
}

impl ControllerResolver for FsControllerResolver {
    fn exists(&self, path: &str) -> bool {
        self.relative(&format!("{path}.{}", self.file_extension))
            .is_some_and(|p| p.is_file())
    }

    fn is_directory(&self, path: &str) -> bool {
        self.relative(path).is_some_and(|p| p.is_dir())
    }
}

/// An in-memory set of controllers and directories.
///
/// # Examples
///
/// ```
/// use waypoint_http::urls::controllers::{ControllerResolver, StaticControllerResolver};
///
/// let resolver = StaticControllerResolver::new()
///     .with_controller("blog")
///     .with_controller("admin/user");
///
/// assert!(resolver.exists("admin/user"));
/// assert!(resolver.is_directory("admin"));
/// assert!(!resolver.exists("admin"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticControllerResolver {
    controllers: HashSet<String>,
    directories: HashSet<String>,
}

impl StaticControllerResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller. Its parent directories are registered too.
    #[must_use]
    pub fn with_controller(mut self, path: &str) -> Self {
        let path = path.trim_matches('/');
        let mut parent = path;
        while let Some((dir, _)) = parent.rsplit_once('/') {
            self.directories.insert(dir.to_string());
            parent = dir;
        }
        self.controllers.insert(path.to_string());
        self
    }

    /// Registers an empty directory.
    #[must_use]
    pub fn with_directory(mut self, path: &str) -> Self {
        self.directories.insert(path.trim_matches('/').to_string());
        self
    }
}

impl ControllerResolver for StaticControllerResolver {
    fn exists(&self, path: &str) -> bool {
        self.controllers.contains(path)
    }

    fn is_directory(&self, path: &str) -> bool {
        self.directories.contains(path)
    }
}
