//! slotcache - Inspect and manage a single-slot-per-type cache
//!
//! Lists, prints, saves and removes cached slots by identifier, using the same
//! directory layout and metadata store as the library.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slotcache::cli::{self, Cli};
use slotcache::SingletonStore;

/// Installs the log subscriber, honouring `RUST_LOG` unless `--verbose` is set
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("slotcache=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = cli.store_config().and_then(|config| {
        let store = SingletonStore::open(&config);
        cli::run(&cli.command, &store, &mut io::stdout().lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
