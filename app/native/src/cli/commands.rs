//! CLI argument definitions using Clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use super::demo;
use crate::config;
use crate::error::GlideError;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Glide - per-window animation and decoration engine.
///
/// Without options, maps a few windows on a virtual 1920x1080 monitor, moves
/// and closes them, and logs every transition until the scene is idle.
#[derive(Parser, Debug)]
#[command(name = "glide")]
#[command(author, version = APP_VERSION, about, long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of the default search paths.
    #[arg(long, short, env = "GLIDE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output the configuration JSON Schema and exit.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    #[arg(long)]
    schema: bool,

    /// Upper bound on frames drawn per scenario step.
    #[arg(long, default_value_t = 600, value_name = "FRAMES")]
    max_frames: u32,
}

impl Cli {
    /// Executes the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo scene cannot be set up.
    pub fn execute(self) -> Result<(), GlideError> {
        if self.schema {
            println!("{}", config::generate_schema_json());
            return Ok(());
        }

        let rejected = self.config.is_some_and(|path| !config::set_custom_config_path(path));
        if rejected {
            tracing::warn!("configuration path already set, ignoring --config");
        }

        let config = Arc::new(config::init().clone());
        demo::run(config, self.max_frames)
    }
}
