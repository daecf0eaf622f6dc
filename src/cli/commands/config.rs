//! Config file inspection command.

use crate::config::{self, Config};

/// Print the config file location and effective settings
pub fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let Some(path) = config::config_path() else {
        anyhow::bail!("Could not determine config directory");
    };

    if init {
        if path.exists() {
            println!("Config already exists at {:?}", path);
        } else {
            config::save(config)?;
            println!("✓ Wrote default config to {:?}", path);
        }
    }

    println!("Config file: {:?}", path);
    println!();

    let token = if config.credentials.spotify_access_token.is_some() {
        "set"
    } else if std::env::var("SPOTIFY_ACCESS_TOKEN").is_ok() {
        "set (SPOTIFY_ACCESS_TOKEN)"
    } else {
        "not set"
    };
    println!("Spotify token:      {}", token);

    let matching = &config.matching;
    match matching.min_score {
        Some(min) => println!("Minimum score:      {}", min),
        None => println!("Minimum score:      none"),
    }
    println!("Search limit:       {}", matching.policy().search_limit);
    println!("Skip malformed:     {}", matching.skip_malformed);

    let network = &config.network;
    println!("Concurrency:        {}", network.concurrency);
    println!("Request interval:   {} ms", network.min_request_interval_ms);
    println!("Timeout:            {} s", network.timeout_secs);

    if let Some(export) = &config.library.export_path {
        println!("Library export:     {:?}", export);
    }
    if let Some(report) = &config.library.report_path {
        println!("Report path:        {:?}", report);
    }

    Ok(())
}
