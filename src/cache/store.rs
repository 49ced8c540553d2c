//! Single-slot-per-type cache on disk
//!
//! Provides a `SingletonStore` that keeps at most one JSON-serialized value per
//! cached type, plus the time that type was last saved.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::CacheError;
use super::key::{self, Cached};
use super::metadata::{FileMetadataStore, MetadataStore};
use crate::config::StoreConfig;

/// Stores one value per type in a cache directory
///
/// Each type implementing [`Cached`] owns the slot file
/// `<cache_dir>/<namespace>.<CACHE_ID>.cache`. Saving replaces the slot
/// content and records the save time in the metadata store under
/// `<namespace>.<CACHE_ID>.key`.
///
/// The store holds no in-memory state besides its configuration, so every
/// call site sharing the same directory and namespace sees the same slots.
/// Operations are not synchronized; callers must not write the same type from
/// several threads at once.
#[derive(Debug)]
pub struct SingletonStore<M = FileMetadataStore> {
    /// Directory where slot files are stored
    cache_dir: PathBuf,
    /// Prefix for slot file names and metadata keys
    namespace: String,
    metadata: M,
}

impl SingletonStore<FileMetadataStore> {
    /// Creates a store from a resolved configuration
    pub fn open(config: &StoreConfig) -> Self {
        Self::with_metadata(
            config.cache_dir.clone(),
            config.namespace.clone(),
            FileMetadataStore::new(&config.metadata_path),
        )
    }
}

impl<M: MetadataStore> SingletonStore<M> {
    /// Creates a store with a custom metadata backend
    pub fn with_metadata(cache_dir: PathBuf, namespace: impl Into<String>, metadata: M) -> Self {
        Self {
            cache_dir,
            namespace: namespace.into(),
            metadata,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the slot path for an identifier
    ///
    /// Fails with `InvalidIdentifier` if either the namespace or `id` could
    /// name a file outside the cache directory.
    pub fn slot_path(&self, id: &str) -> Result<PathBuf, CacheError> {
        key::validate_namespace(&self.namespace)?;
        key::validate_id(id)?;
        Ok(self
            .cache_dir
            .join(key::slot_file_name(&self.namespace, id)))
    }

    /// Returns the metadata key holding the save timestamp for an identifier
    pub fn metadata_key(&self, id: &str) -> String {
        key::metadata_key(&self.namespace, id)
    }

    /// Saves `value` into its type's slot, replacing any previous value
    ///
    /// The save time is recorded only after the slot file was fully written.
    pub fn save<T: Cached>(&self, value: &T) -> Result<(), CacheError> {
        self.write_slot(T::CACHE_ID, value)
    }

    /// Loads the value of type `T`
    ///
    /// Returns `None` if nothing was saved, the OS purged the slot, or its
    /// content cannot be decoded as `T`.
    pub fn load<T: Cached>(&self) -> Option<T> {
        self.try_load().ok().flatten()
    }

    /// Loads the value of type `T`, reporting why a present slot is unusable
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the slot holds a valid `T`
    /// * `Ok(None)` if the slot is empty
    /// * `Err` if the slot exists but cannot be read or decoded
    pub fn try_load<T: Cached>(&self) -> Result<Option<T>, CacheError> {
        self.read_slot(T::CACHE_ID)
    }

    /// Whether the slot of type `T` currently holds a file
    pub fn contains<T: Cached>(&self) -> bool {
        self.slot_path(T::CACHE_ID)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Deletes the slot of type `T`
    ///
    /// Returns `Ok(false)` if the slot was already empty. The save timestamp is
    /// kept, so [`Self::last_save_date`] keeps reporting the last time this
    /// type was ever saved.
    pub fn remove<T: Cached>(&self) -> Result<bool, CacheError> {
        self.remove_id(T::CACHE_ID)
    }

    /// Time of the last successful save of type `T`
    pub fn last_save_date<T: Cached>(&self) -> Option<DateTime<Utc>> {
        self.last_save_date_for(T::CACHE_ID)
    }

    /// Saves an untyped JSON value under `id`
    pub fn save_raw(&self, id: &str, value: &Value) -> Result<(), CacheError> {
        self.write_slot(id, value)
    }

    /// Loads the untyped JSON value stored under `id`
    pub fn load_raw(&self, id: &str) -> Result<Option<Value>, CacheError> {
        self.read_slot(id)
    }

    /// Deletes the slot stored under `id`
    pub fn remove_id(&self, id: &str) -> Result<bool, CacheError> {
        let path = self.slot_path(id)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(id, path = %path.display(), "removed cache slot");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(id, "cache slot already empty");
                Ok(false)
            }
            Err(e) => {
                warn!(id, path = %path.display(), error = %e, "failed to remove cache slot");
                Err(CacheError::io(path, e))
            }
        }
    }

    /// Time of the last successful save under `id`
    ///
    /// An unreadable metadata store is logged and reported as `None`.
    pub fn last_save_date_for(&self, id: &str) -> Option<DateTime<Utc>> {
        let key = self.metadata_key(id);
        self.metadata
            .last_saved(&key)
            .inspect_err(|e| warn!(key = %key, error = %e, "failed to read save timestamp"))
            .ok()
            .flatten()
    }

    /// Lists the identifiers with a slot file in the cache directory, sorted
    pub fn slots(&self) -> Result<Vec<String>, CacheError> {
        key::validate_namespace(&self.namespace)?;
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.cache_dir, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&self.cache_dir, e))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(id) = file_name
                .to_str()
                .and_then(|name| key::id_from_file_name(&self.namespace, name))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| {
            CacheError::directory(
                format!("cannot create {}", self.cache_dir.display()),
                Some(e),
            )
        })
    }

    fn write_slot<V: Serialize + ?Sized>(&self, id: &str, value: &V) -> Result<(), CacheError> {
        let result = self.write_slot_inner(id, value);
        if let Err(e) = &result {
            warn!(id, error = %e, "failed to save cache slot");
        }
        result
    }

    fn write_slot_inner<V: Serialize + ?Sized>(
        &self,
        id: &str,
        value: &V,
    ) -> Result<(), CacheError> {
        let path = self.slot_path(id)?;
        let json = serde_json::to_vec(value).map_err(|source| CacheError::SerializationFailed {
            id: id.to_string(),
            source,
        })?;

        self.ensure_dir()?;

        // Write beside the slot and rename, so readers never see a partial file.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        if let Err(e) = fs::write(&tmp, &json) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::io(tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::io(path, e));
        }

        self.metadata
            .record_save(&self.metadata_key(id), Utc::now())?;
        debug!(id, path = %path.display(), bytes = json.len(), "saved cache slot");
        Ok(())
    }

    fn read_slot<V: DeserializeOwned>(&self, id: &str) -> Result<Option<V>, CacheError> {
        let path = self.slot_path(id)?;
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                debug!(id, path = %path.display(), error = %e, "cache slot unreadable");
                return Err(CacheError::io(path, e));
            }
        };

        serde_json::from_slice(&content).map(Some).map_err(|source| {
            debug!(id, error = %source, "cache slot content is not decodable");
            CacheError::DeserializationFailed {
                id: id.to_string(),
                source,
            }
        })
    }
}
