//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for Music Migrator.
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `migrate`: Library matching, single-track matching and saving
//! - `config`: Config file inspection

mod config;
mod migrate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use config::cmd_config;
pub use migrate::{MigrateOptions, cmd_match, cmd_migrate, cmd_save};

/// Music Migrator CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Match a library export against Spotify and write a report
    Migrate {
        /// Library export to migrate (defaults to library.export_path from config)
        export: Option<PathBuf>,
        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(short, long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Report matches scoring at or below this as unmatched
        #[arg(long)]
        min_score: Option<u8>,
        /// Searches in flight at once
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Report path (defaults to library.report_path from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Save matched tracks to the Spotify library
        #[arg(long)]
        save: bool,
    },
    /// Find the best Spotify match for a single track
    Match {
        /// Track title
        #[arg(long)]
        title: String,
        /// Artist name
        #[arg(long)]
        artist: String,
        /// Album name
        #[arg(long)]
        album: Option<String>,
        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(short, long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Save the matched tracks from a report to the Spotify library
    Save {
        /// Report written by `migrate`
        report: PathBuf,
        /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
        #[arg(short, long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write a config file with the current settings if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let config = crate::config::load();

    match &cli.command {
        Some(Commands::Migrate {
            export,
            token,
            min_score,
            concurrency,
            output,
            save,
        }) => {
            let rt = Runtime::new()?;
            let options = MigrateOptions {
                export: export.clone(),
                token: token.clone(),
                min_score: *min_score,
                concurrency: *concurrency,
                output: output.clone(),
                save: *save,
            };
            cmd_migrate(&rt, &config, options)?;
            Ok(true)
        }
        Some(Commands::Match {
            title,
            artist,
            album,
            token,
        }) => {
            let rt = Runtime::new()?;
            cmd_match(
                &rt,
                &config,
                title,
                artist,
                album.as_deref(),
                token.as_deref(),
            )?;
            Ok(true)
        }
        Some(Commands::Save { report, token }) => {
            let rt = Runtime::new()?;
            cmd_save(&rt, &config, report, token.as_deref())?;
            Ok(true)
        }
        Some(Commands::Config { init }) => {
            cmd_config(&config, *init)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
