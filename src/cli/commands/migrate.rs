//! Library migration commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::migration::{
    LibraryExport, MigrationConfig, MigrationError, MigrationReport, MigrationService,
    SourceTrack, UnmatchedReason,
};

/// Report file used when neither the flag nor the config names one
const DEFAULT_REPORT_PATH: &str = "migration_report.json";

/// Flags for `migrate` that override config values
pub struct MigrateOptions {
    pub export: Option<PathBuf>,
    pub token: Option<String>,
    pub min_score: Option<u8>,
    pub concurrency: Option<usize>,
    pub output: Option<PathBuf>,
    pub save: bool,
}

/// Match a whole library export and write the report
pub fn cmd_migrate(rt: &Runtime, config: &Config, options: MigrateOptions) -> anyhow::Result<()> {
    let export = options
        .export
        .or_else(|| config.library.export_path.clone())
        .context("No library export given (pass a path or set library.export_path)")?;
    let output = options
        .output
        .or_else(|| config.library.report_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    let mut migration = config.migration_config(options.token.as_deref());
    if options.min_score.is_some() {
        migration.policy.min_score = options.min_score;
    }
    if let Some(concurrency) = options.concurrency {
        migration.concurrency = concurrency.max(1);
    }
    let service = build_service(migration)?;
    let save = options.save;

    rt.block_on(async {
        println!("Migrating library from {:?}", export);

        let (loaded, report) = service
            .migrate_library(&LibraryExport::new(&export))
            .await?;

        if loaded.rejected > 0 {
            println!("Skipped {} malformed songs", loaded.rejected);
        }
        print_unmatched(&report);
        println!();
        println!("{}", report.summary());

        report.write_to(&output)?;
        println!("Report written to {:?}", output);

        if save {
            save_report(&service, &report).await;
        } else {
            println!("Run `save {}` to add the matches to your library.", output.display());
        }

        anyhow::Ok(())
    })
}

/// Find the best match for one track and print it
pub fn cmd_match(
    rt: &Runtime,
    config: &Config,
    title: &str,
    artist: &str,
    album: Option<&str>,
    token: Option<&str>,
) -> anyhow::Result<()> {
    let mut track = SourceTrack::new(title, artist)?;
    if let Some(album) = album {
        track = track.with_album(album);
    }
    let service = build_service(config.migration_config(token))?;

    rt.block_on(async {
        println!("Searching for: {}", track);
        println!();

        match service.find_match(&track).await {
            Ok(pair) => {
                let Some(candidate) = pair.candidate else {
                    println!("✗ No match found.");
                    return anyhow::Ok(());
                };
                let score = candidate.score().unwrap_or(0);
                println!("✓ Match found! (score: {})", score);
                println!();
                println!("  Title:  {}", candidate.title());
                println!("  Artist: {}", candidate.artist());
                if let Some(album) = candidate.album() {
                    println!("  Album:  {}", album);
                }
                if let Some(year) = candidate.year() {
                    println!("  Year:   {}", year);
                }
                println!("  URI:    {}", candidate.uri());
                if !service.policy().accepts(score) {
                    println!();
                    println!("  Note: score is below the configured minimum.");
                }
                Ok(())
            }
            Err(MigrationError::NoMatch { query, .. }) => {
                println!("✗ No matches found.");
                println!("  Last query: {}", query);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    })
}

/// Save the matched tracks from an existing report
pub fn cmd_save(
    rt: &Runtime,
    config: &Config,
    report_path: &Path,
    token: Option<&str>,
) -> anyhow::Result<()> {
    let report = MigrationReport::read_from(report_path)?;
    let service = build_service(config.migration_config(token))?;

    rt.block_on(save_report(&service, &report));
    Ok(())
}

fn build_service(config: MigrationConfig) -> anyhow::Result<MigrationService> {
    if config.access_token.trim().is_empty() {
        anyhow::bail!(
            "Spotify access token required.\n\
             Use: --token YOUR_TOKEN, set SPOTIFY_ACCESS_TOKEN, or add it to the config file"
        );
    }
    Ok(MigrationService::new(config)?)
}

async fn save_report(service: &MigrationService, report: &MigrationReport) {
    let uris = report.uris();
    if uris.is_empty() {
        println!("Nothing to save.");
        return;
    }

    println!("Saving {} tracks to your library...", uris.len());
    let failed = service.save_matches(&uris).await;
    if failed == 0 {
        println!("✓ Saved {} tracks", uris.len());
    } else {
        eprintln!("✗ {} of {} tracks failed to save", failed, uris.len());
    }
}

fn print_unmatched(report: &MigrationReport) {
    if report.unmatched.is_empty() {
        return;
    }

    println!();
    println!("Unmatched tracks:");
    for entry in &report.unmatched {
        let reason = match &entry.reason {
            UnmatchedReason::NoResults { .. } => "no results".to_string(),
            UnmatchedReason::BelowThreshold { best } => format!(
                "best was {} - {} (score {})",
                best.title(),
                best.artist(),
                best.score().unwrap_or(0)
            ),
            UnmatchedReason::Failed { error } => error.clone(),
        };
        println!("  {} ({})", entry.source, reason);
    }
}
