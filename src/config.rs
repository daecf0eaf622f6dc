//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-migrator\config.toml
//! - macOS: ~/Library/Application Support/music-migrator/config.toml
//! - Linux: ~/.config/music-migrator/config.toml
//!
//! The config file is human-readable and editable. Command-line flags and
//! environment variables override values from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::migration::{MatchPolicy, MigrationConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Match selection settings
    pub matching: MatchingConfig,

    /// Request pacing and timeouts
    pub network: NetworkConfig,

    /// Library settings
    pub library: LibraryConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Spotify OAuth access token (needs `user-library-modify` to save)
    pub spotify_access_token: Option<String>,
}

/// Match selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Matches scoring at or below this are reported as unmatched (unset = accept all)
    pub min_score: Option<u8>,

    /// Results requested per search (1-50)
    pub search_limit: u32,

    /// Skip unparseable search results instead of failing the track
    pub skip_malformed: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let policy = MatchPolicy::default();
        Self {
            min_score: policy.min_score,
            search_limit: policy.search_limit,
            skip_malformed: policy.skip_malformed,
        }
    }
}

impl MatchingConfig {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            search_limit: self.search_limit.clamp(1, 50),
            min_score: self.min_score,
            skip_malformed: self.skip_malformed,
        }
    }
}

/// Request pacing and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Searches in flight at once (1 = sequential)
    pub concurrency: usize,

    /// Minimum milliseconds between searches, across all workers
    pub min_request_interval_ms: u64,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            min_request_interval_ms: 100,
            timeout_secs: 30,
        }
    }
}

/// Library settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Source library export to migrate
    pub export_path: Option<PathBuf>,

    /// Where `migrate` writes its report
    pub report_path: Option<PathBuf>,
}

impl Config {
    /// Build the migration service config, with `token` overriding the file
    pub fn migration_config(&self, token: Option<&str>) -> MigrationConfig {
        MigrationConfig {
            access_token: token
                .map(str::to_string)
                .or_else(|| self.credentials.spotify_access_token.clone())
                .unwrap_or_default(),
            policy: self.matching.policy(),
            concurrency: self.network.concurrency.max(1),
            min_request_interval: Duration::from_millis(self.network.min_request_interval_ms),
            timeout: Duration::from_secs(self.network.timeout_secs.max(1)),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-migrator"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
