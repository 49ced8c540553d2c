//! Key-value store for save timestamps
//!
//! Timestamps live apart from the slot files: the cache directory may be
//! purged by the OS at any time, while the metadata store is kept in the user
//! data directory.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::error::CacheError;

/// Persistent map from metadata keys to save timestamps
pub trait MetadataStore {
    /// Returns the timestamp stored under `key`, if any
    fn last_saved(&self, key: &str) -> Result<Option<DateTime<Utc>>, CacheError>;

    /// Stores `at` under `key`, replacing any earlier value
    fn record_save(&self, key: &str, at: DateTime<Utc>) -> Result<(), CacheError>;
}

/// Metadata store backed by a single JSON document on disk
///
/// The document is a flat object of RFC 3339 timestamps:
///
/// ```json
/// { "slotcache.Config.key": "2024-05-01T09:00:00Z" }
/// ```
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    path: PathBuf,
}

impl FileMetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, DateTime<Utc>>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.error(e)),
        };
        serde_json::from_str(&content).map_err(|e| self.error(e))
    }

    fn write_entries(&self, entries: &BTreeMap<String, DateTime<Utc>>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| self.error(e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                self.error(e)
            })
    }

    fn error(&self, e: impl std::fmt::Display) -> CacheError {
        CacheError::Metadata {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

impl MetadataStore for FileMetadataStore {
    fn last_saved(&self, key: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        Ok(self.read_entries()?.get(key).copied())
    }

    /// Stores `at` under `key`
    ///
    /// A document that cannot be read or parsed is replaced by one holding
    /// only this entry, so a damaged file never blocks later saves.
    fn record_save(&self, key: &str, at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable metadata document");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), at);
        self.write_entries(&entries)?;
        debug!(key, path = %self.path.display(), "recorded save timestamp");
        Ok(())
    }
}

/// Metadata store kept in process memory
///
/// Nothing is persisted; useful for tests and for hosts that track save times
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn last_saved(&self, key: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).copied())
    }

    fn record_save(&self, key: &str, at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), at);
        Ok(())
    }
}
