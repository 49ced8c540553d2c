//! Type identity for cached values
//!
//! Every cached type declares a stable string identifier through the [`Cached`]
//! trait. The identifier, qualified by the store namespace, names both the slot
//! file and the metadata key, so it must stay the same across releases if old
//! caches should keep loading.

use serde::{de::DeserializeOwned, Serialize};

use super::error::CacheError;

/// A value that owns a single cache slot
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use slotcache::Cached;
///
/// #[derive(Serialize, Deserialize)]
/// struct WorkingHours {
///     start: String,
///     end: String,
/// }
///
/// impl Cached for WorkingHours {
///     const CACHE_ID: &'static str = "WorkingHours";
/// }
/// ```
pub trait Cached: Serialize + DeserializeOwned {
    /// Identifier of this type's slot
    const CACHE_ID: &'static str;
}

/// Checks that an identifier can be embedded in a file name
///
/// Rejects empty identifiers, path separators, parent-directory components and
/// control characters.
pub fn validate_id(id: &str) -> Result<(), CacheError> {
    let invalid = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.chars().any(|c| c == '/' || c == '\\' || c.is_control());

    if invalid {
        return Err(CacheError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}

/// Checks that a namespace can prefix slot file names
///
/// Same rules as [`validate_id`], and additionally no `.`: the namespace ends
/// at the first dot of a slot file name, so `app` and `app.beta` can never
/// claim each other's slots.
pub fn validate_namespace(namespace: &str) -> Result<(), CacheError> {
    validate_id(namespace)?;
    if namespace.contains('.') {
        return Err(CacheError::InvalidIdentifier(namespace.to_string()));
    }
    Ok(())
}

/// File name of the slot for `id`, e.g. `slotcache.WorkingHours.cache`
pub fn slot_file_name(namespace: &str, id: &str) -> String {
    format!("{}.{}.cache", namespace, id)
}

/// Metadata key of the save timestamp for `id`, e.g. `slotcache.WorkingHours.key`
pub fn metadata_key(namespace: &str, id: &str) -> String {
    format!("{}.{}.key", namespace, id)
}

/// Extracts the identifier from a slot file name belonging to `namespace`
pub fn id_from_file_name<'a>(namespace: &str, file_name: &'a str) -> Option<&'a str> {
    let id = file_name
        .strip_prefix(namespace)?
        .strip_prefix('.')?
        .strip_suffix(".cache")?;
    (!id.is_empty()).then_some(id)
}
