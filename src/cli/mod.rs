//! Command-line interface for music-migrator.
//!
//! This module provides CLI commands for matching a library against
//! Spotify, saving the matches, and inspecting configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
