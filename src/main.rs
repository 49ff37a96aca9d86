//! promptforge CLI entry point.
//!
//! Parses arguments, executes the selected command, and renders any
//! failure through the user-friendly error presentation before exiting
//! non-zero.

use anyhow::Result;
use clap::Parser;
use promptforge::cli;
use promptforge::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
