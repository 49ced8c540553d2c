//! Store configuration
//!
//! Resolves where slot files and the metadata document live. Defaults come
//! from XDG-compliant project directories; the CLI can override each piece.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::cache::CacheError;

/// Name used for project directories and as the default namespace
pub const APP_NAME: &str = "slotcache";

/// File name of the metadata document inside the data directory
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Locations and naming used by a [`crate::cache::SingletonStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix of every slot file name and metadata key
    pub namespace: String,
    /// Directory holding the slot files (OS-purgeable)
    pub cache_dir: PathBuf,
    /// JSON document holding save timestamps
    pub metadata_path: PathBuf,
}

impl StoreConfig {
    /// Creates a config with explicit locations and the default namespace
    pub fn new(cache_dir: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            namespace: APP_NAME.to_string(),
            cache_dir: cache_dir.into(),
            metadata_path: metadata_path.into(),
        }
    }

    /// Resolves the default locations
    ///
    /// Uses `~/.cache/slotcache/` for slots and
    /// `~/.local/share/slotcache/metadata.json` for timestamps on Linux, or the
    /// platform equivalents elsewhere. Fails if no home directory can be found.
    pub fn from_project_dirs() -> Result<Self, CacheError> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
            CacheError::directory("no home directory to place the cache in", None)
        })?;

        Ok(Self::new(
            project_dirs.cache_dir(),
            project_dirs.data_dir().join(METADATA_FILE_NAME),
        ))
    }

    /// Replaces the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_namespace() {
        let config = StoreConfig::new("/tmp/cache", "/tmp/meta.json");
        assert_eq!(config.namespace, APP_NAME);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.metadata_path, PathBuf::from("/tmp/meta.json"));
    }

    #[test]
    fn test_with_namespace() {
        let config = StoreConfig::new("/tmp/cache", "/tmp/meta.json").with_namespace("bank");
        assert_eq!(config.namespace, "bank");
    }

    #[test]
    fn test_from_project_dirs_creates_xdg_compliant_paths() {
        if let Ok(config) = StoreConfig::from_project_dirs() {
            assert!(config.cache_dir.to_string_lossy().contains(APP_NAME));
            assert!(config.metadata_path.ends_with(METADATA_FILE_NAME));
            assert_ne!(config.metadata_path.parent(), Some(config.cache_dir.as_path()));
        }
        // Test passes if resolution fails (e.g., no home directory in CI)
    }
}
