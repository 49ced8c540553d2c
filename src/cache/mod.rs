//! Cache module for persisting one value per type to disk
//!
//! This module provides a store that keeps a single JSON-serialized value per
//! cached type in an OS-purgeable cache directory, and records when each type
//! was last saved in a separate metadata store. Loading never fails hard: a
//! missing or corrupt slot simply yields no value.

mod error;
pub mod key;
mod metadata;
mod store;

pub use error::CacheError;
pub use key::Cached;
pub use metadata::{FileMetadataStore, MemoryMetadataStore, MetadataStore};
pub use store::SingletonStore;
