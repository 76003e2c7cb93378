use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub publish: Option<PublishConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Age after which derived attributes are recomputed
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: u64,
    /// Records generated at or before this instant have never been analyzed
    #[serde(default = "default_sentinel_epoch")]
    pub sentinel_epoch: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub path: String,
    /// Maximum size of a single log file in MiB
    #[serde(default = "default_log_size")]
    pub size: u64,
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_hours: default_stale_after_hours(),
            sentinel_epoch: default_sentinel_epoch(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_stale_after_hours() -> u64 {
    48
}

pub fn default_sentinel_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_size() -> u64 {
    10
}

fn default_log_max_files() -> usize {
    5
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_text = fs::read_to_string(Path::new(path))?;
    parse_config(&config_text)
}

pub fn parse_config(config_text: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_text)?;
    Ok(config)
}
