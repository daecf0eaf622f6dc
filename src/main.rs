//! Music Migrator - moves a music library between streaming services.
//!
//! Reads an export of the source library, finds each track in the Spotify
//! catalog by fuzzy matching, reports what matched, and saves the matches
//! to the user's Spotify library.

pub mod cli;
pub mod config;
pub mod error;
pub mod migration;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("music_migrator=info".parse()?))
        .init();

    if cli::run_command(&args)? {
        return Ok(());
    }

    // No command specified
    cli::Cli::command().print_help()?;
    Ok(())
}
