//! Error types for slot cache operations

use std::path::PathBuf;

use thiserror::Error;

/// Error types for saving, loading and removing cached slots
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be located or created
    #[error("Cache directory unavailable: {reason}")]
    DirectoryUnavailable {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The slot identifier cannot be used to build a file name
    #[error("Invalid cache identifier '{0}'")]
    InvalidIdentifier(String),

    /// The value could not be encoded as JSON
    #[error("Failed to serialize '{id}': {source}")]
    SerializationFailed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading, writing or deleting a slot file failed
    #[error("I/O error on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slot content is not a valid encoding of the requested type
    #[error("Failed to deserialize '{id}': {source}")]
    DeserializationFailed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata store could not be read or written
    #[error("Metadata store error on {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn directory(reason: impl Into<String>, source: Option<std::io::Error>) -> Self {
        CacheError::DirectoryUnavailable {
            reason: reason.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_failure_message_includes_path() {
        let err = CacheError::io(
            "/tmp/slot.cache",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/slot.cache"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_invalid_identifier_message() {
        let err = CacheError::InvalidIdentifier("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid cache identifier '../etc'");
    }
}
