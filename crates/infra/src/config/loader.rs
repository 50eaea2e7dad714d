//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `LIVEGATE_STORAGE_PATH` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file either, uses [`AppConfig::default`]
//!
//! ## Environment Variables
//! - `LIVEGATE_STORAGE_PATH`: SQLite database file path (required)
//! - `LIVEGATE_API_URL`: Liveness evaluation URL
//! - `LIVEGATE_API_TIMEOUT_SECS`: Evaluation request timeout in seconds
//! - `LIVEGATE_PROBE_TIMEOUT_SECS`: Health probe timeout in seconds
//! - `LIVEGATE_PIPELINE_CONCURRENCY`: Items evaluated at once
//! - `LIVEGATE_DEFAULT_ENDPOINT_URL`: Endpoint seeded into an empty registry
//! - `LIVEGATE_DEFAULT_ENDPOINT_TAG`: Tag of the seeded endpoint
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./livegate.json` or `./livegate.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use livegate_domain::{AppConfig, LiveGateError, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LiveGateError::Config` if an environment value or a discovered
/// config file is invalid.
pub fn load() -> Result<AppConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            if probe_config_paths().is_some() {
                load_from_file(None)
            } else {
                tracing::info!("No configuration found; using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `LIVEGATE_STORAGE_PATH` must be present; every other variable falls back
/// to its default when unset.
///
/// # Errors
/// Returns `LiveGateError::Config` if the storage path is missing or a value
/// does not parse.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();

    config.storage.path = env_var("LIVEGATE_STORAGE_PATH")?;

    if let Some(url) = env_opt("LIVEGATE_API_URL") {
        config.api.liveness_url = url;
    }
    if let Some(secs) = env_parse::<u64>("LIVEGATE_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>("LIVEGATE_PROBE_TIMEOUT_SECS")? {
        config.api.probe_timeout_secs = secs;
    }
    if let Some(concurrency) = env_parse::<usize>("LIVEGATE_PIPELINE_CONCURRENCY")? {
        config.pipeline.concurrency = concurrency;
    }
    if let Some(url) = env_opt("LIVEGATE_DEFAULT_ENDPOINT_URL") {
        config.default_endpoint.url = url;
    }
    if let Some(tag) = env_opt("LIVEGATE_DEFAULT_ENDPOINT_TAG") {
        config.default_endpoint.tag = tag;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension). Missing
/// fields take their defaults.
///
/// # Errors
/// Returns `LiveGateError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LiveGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LiveGateError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LiveGateError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LiveGateError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LiveGateError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LiveGateError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("livegate.json"),
        dir.join("livegate.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        LiveGateError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty environment variable, if set
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| LiveGateError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
