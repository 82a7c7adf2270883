//! CLI module for Glide.
//!
//! The binary drives the animation engine against the in-memory scene so the
//! configuration and transitions can be inspected without a compositor.

mod commands;
mod demo;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::GlideError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GLIDE_LOG";

/// Installs the log subscriber, filtered by `GLIDE_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), GlideError> {
    let cli = Cli::parse();
    init_logging();
    cli.execute()
}
