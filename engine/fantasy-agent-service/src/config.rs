//! Service configuration management

use anyhow::{Context, Result};
use player_analytics::AnalyticsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Scoring, windows, screen thresholds and roster caps
    pub analytics: AnalyticsConfig,

    /// Where the registry snapshot and trade journal live
    pub data: DataSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Data file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// JSON snapshot with players, stat lines and roster ids
    pub data_file: PathBuf,

    /// JSON-lines trade audit journal (if None, the audit log is in-memory)
    pub audit_journal: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./data/registry.json"),
            audit_journal: Some(PathBuf::from("./data/trade_audit.jsonl")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string() }
    }
}

/// Load configuration: defaults, then the optional TOML file, then
/// `FANTASY_*` environment variables
pub fn load_config(config_file: Option<&Path>) -> Result<ServiceConfig> {
    let mut config = match config_file {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(path)?
        }
        None => ServiceConfig::default(),
    };

    // Override with environment variables
    load_from_env(&mut config)?;

    // Validate configuration
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file; missing sections keep their defaults
fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {:?}", path))
}

/// Load configuration from environment variables
fn load_from_env(config: &mut ServiceConfig) -> Result<()> {
    config.analytics.apply_env().context("Invalid analytics environment override")?;

    if let Ok(level) = std::env::var("FANTASY_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("FANTASY_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Ok(data_file) = std::env::var("FANTASY_DATA_FILE") {
        config.data.data_file = PathBuf::from(data_file);
    }

    if let Ok(journal) = std::env::var("FANTASY_AUDIT_JOURNAL") {
        config.data.audit_journal = if journal.is_empty() { None } else { Some(journal.into()) };
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.analytics.validate().context("Invalid analytics configuration")?;

    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}

/// Save configuration to a TOML file
pub fn save_config(config: &ServiceConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    Ok(())
}
