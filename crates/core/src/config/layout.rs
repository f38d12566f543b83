use std::path::{Path, PathBuf};

/// Name of the metadata directory under the project root.
pub const META_DIR_NAME: &str = ".guide-sync";
/// Default config file name inside the metadata directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Logical layout of a guide-sync project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct GuideLayout {
    /// Root directory; relative document paths resolve against it.
    pub root: PathBuf,
    /// Directory for tool metadata (.guide-sync).
    pub meta_dir: PathBuf,
    /// Path to the check config file.
    pub config_path: PathBuf,
}

impl GuideLayout {
    /// Compute the default layout for a project rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(META_DIR_NAME);
        let config_path = meta_dir.join(CONFIG_FILE_NAME);
        Self { root, meta_dir, config_path }
    }

    /// Use an explicit config file instead of the default location.
    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = config_path.into();
        self
    }

    /// Resolve a document path from the config (may be relative or absolute).
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Express `path` relative to the root when it lives underneath it.
    pub fn relative_string(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}
