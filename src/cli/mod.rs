//! Command-line interface for promptforge.
//!
//! The CLI is a thin shell around the library pipeline: it parses
//! arguments, loads settings, reads piped input, and turns structured
//! errors into colored diagnostics. All validation and resolution logic
//! lives in the library modules.
//!
//! # Usage
//!
//! ```bash
//! # Render the template for the to/project classification
//! promptforge generate to project --from notes.md
//!
//! # Pipe content in and write the result to a file
//! cat notes.md | promptforge generate summary issue --from - -o out.md
//!
//! # Adaptation qualifier and user variables
//! promptforge generate to task -a strict --uv uv-author=Jane
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug-level logging to stderr
//! - `--quiet` - errors only
//! - `--config` - explicit settings file path

pub mod generate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Top-level argument structure.
#[derive(Parser)]
#[command(
    name = "promptforge",
    about = "Resolve prompt templates and render them with validated variables",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a settings file (defaults to promptforge.toml, then
    /// ~/.promptforge/config.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify, resolve, and render a prompt template.
    Generate(generate::GenerateCommand),
}

impl Cli {
    /// Initializes logging and dispatches to the selected command.
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        match self.command {
            Commands::Generate(cmd) => cmd.execute(self.config.as_deref()),
        }
    }
}

/// Sets up the tracing subscriber on stderr.
///
/// `--verbose` forces debug level and `--quiet` disables everything;
/// otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
