//! slotcache library
//!
//! A typed on-disk cache holding one serialized value per type. The CLI module
//! is exposed for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;

pub use cache::{CacheError, Cached, SingletonStore};
pub use config::StoreConfig;
