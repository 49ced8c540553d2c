//! Command-line interface for slotcache
//!
//! This module handles parsing of CLI arguments using clap, resolving them into
//! a [`StoreConfig`], and running the inspection and maintenance commands
//! against a [`SingletonStore`] by slot identifier.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::cache::{CacheError, MetadataStore, SingletonStore};
use crate::config::StoreConfig;

/// Error types for CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// A store operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The requested slot holds no value
    #[error("No cached value for '{0}'")]
    EmptySlot(String),

    /// The input document could not be read
    #[error("Failed to read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The input document is not valid JSON
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing command output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// slotcache - Inspect and manage a single-slot-per-type cache
#[derive(Parser, Debug)]
#[command(name = "slotcache")]
#[command(about = "Inspect and manage a single-slot-per-type cache")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the slot files
    #[arg(long, global = true, env = "SLOTCACHE_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// JSON document holding save timestamps
    #[arg(long, global = true, env = "SLOTCACHE_METADATA_FILE", value_name = "FILE")]
    pub metadata_file: Option<PathBuf>,

    /// Prefix of slot file names and metadata keys
    #[arg(long, global = true, env = "SLOTCACHE_NAMESPACE")]
    pub namespace: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List cached slots with their last save time
    List,

    /// Print the cached value of a slot
    Show {
        /// Slot identifier
        id: String,
    },

    /// Save a JSON document into a slot
    ///
    /// Examples:
    ///   slotcache save Config config.json
    ///   echo '{"status":"SUCCESS"}' | slotcache save Config -
    Save {
        /// Slot identifier
        id: String,
        /// JSON file to store, or `-` for stdin
        file: String,
    },

    /// Delete the cached value of a slot
    Remove {
        /// Slot identifier
        id: String,
    },

    /// Show where a slot lives and when it was last saved
    Info {
        /// Slot identifier
        id: String,
    },
}

impl Cli {
    /// Resolves the store configuration, filling unset locations from the
    /// XDG project directories
    pub fn store_config(&self) -> Result<StoreConfig, CliError> {
        let mut config = match (&self.cache_dir, &self.metadata_file) {
            (Some(cache_dir), Some(metadata_file)) => StoreConfig::new(cache_dir, metadata_file),
            (cache_dir, metadata_file) => {
                let mut config = StoreConfig::from_project_dirs()?;
                if let Some(dir) = cache_dir {
                    config.cache_dir = dir.clone();
                }
                if let Some(file) = metadata_file {
                    config.metadata_path = file.clone();
                }
                config
            }
        };

        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace.clone());
        }
        Ok(config)
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "never".to_string())
}

fn read_document(file: &str) -> Result<serde_json::Value, CliError> {
    let content = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(file)
    }
    .map_err(|source| CliError::Input {
        path: file.to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CliError::InvalidJson {
        path: file.to_string(),
        source,
    })
}

/// Runs a command against `store`, writing human-readable output to `out`
pub fn run<M: MetadataStore>(
    command: &Command,
    store: &SingletonStore<M>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::List => {
            let ids = store.slots()?;
            if ids.is_empty() {
                writeln!(out, "No cached slots in {}", store.cache_dir().display())?;
            }
            for id in ids {
                writeln!(out, "{}\t{}", id, format_time(store.last_save_date_for(&id)))?;
            }
        }
        Command::Show { id } => {
            let value = store
                .load_raw(id)?
                .ok_or_else(|| CliError::EmptySlot(id.clone()))?;
            let pretty = serde_json::to_string_pretty(&value).map_err(|source| {
                CacheError::SerializationFailed {
                    id: id.clone(),
                    source,
                }
            })?;
            writeln!(out, "{}", pretty)?;
        }
        Command::Save { id, file } => {
            let value = read_document(file)?;
            store.save_raw(id, &value)?;
            info!(id = %id, "saved slot from {}", file);
            writeln!(out, "Saved {}", id)?;
        }
        Command::Remove { id } => {
            if store.remove_id(id)? {
                writeln!(out, "Removed {}", id)?;
            } else {
                writeln!(out, "{} was not cached", id)?;
            }
        }
        Command::Info { id } => {
            let path = store.slot_path(id)?;
            writeln!(out, "namespace:  {}", store.namespace())?;
            writeln!(out, "id:         {}", id)?;
            writeln!(out, "path:       {}", path.display())?;
            writeln!(out, "cached:     {}", if path.is_file() { "yes" } else { "no" })?;
            writeln!(out, "key:        {}", store.metadata_key(id))?;
            writeln!(out, "last saved: {}", format_time(store.last_save_date_for(id)))?;
        }
    }
    Ok(())
}
