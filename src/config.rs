//! Runtime configuration
//!
//! Everything is read from `NUTRISCAN_*` environment variables with
//! defaults suitable for talking to the public Open Food Facts instance.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::build_info::BuildInfo;
use crate::external::OpenFoodFactsConfig;

pub const ENV_DATABASE_PATH: &str = "NUTRISCAN_DATABASE_PATH";
pub const ENV_OFF_BASE_URL: &str = "NUTRISCAN_OFF_BASE_URL";
pub const ENV_USER_AGENT: &str = "NUTRISCAN_USER_AGENT";
pub const ENV_PAGE_SIZE: &str = "NUTRISCAN_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "NUTRISCAN_TIMEOUT_SECS";
pub const ENV_CACHE_CAPACITY: &str = "NUTRISCAN_CACHE_CAPACITY";
pub const ENV_MODEL_NAME: &str = "NUTRISCAN_MODEL_NAME";

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file holding the feedback log
    pub database_path: PathBuf,
    pub off: OpenFoodFactsConfig,
    pub cache_capacity: usize,
    /// Name of the detector model feeding labels, reported by status
    pub model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            off: OpenFoodFactsConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            model_name: "unknown".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(url) = get(ENV_OFF_BASE_URL) {
            config.off.base_url = url.trim().to_string();
        }
        if let Some(agent) = get(ENV_USER_AGENT) {
            config.off.user_agent = agent;
        }
        if let Some(raw) = get(ENV_PAGE_SIZE) {
            config.off.page_size = parse_positive(ENV_PAGE_SIZE, &raw)? as u32;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.off.timeout = Duration::from_secs(parse_positive(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = get(ENV_CACHE_CAPACITY) {
            config.cache_capacity = parse_positive(ENV_CACHE_CAPACITY, &raw)? as usize;
        }
        if let Some(name) = get(ENV_MODEL_NAME) {
            config.model_name = name;
        }

        Ok(config)
    }

    pub fn user_agent_is_default(&self) -> bool {
        self.off.user_agent == BuildInfo::user_agent()
    }
}

fn parse_positive(name: &'static str, raw: &str) -> ConfigResult<u64> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason,
    };
    let value: u64 = raw.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if value == 0 || value > u32::MAX as u64 {
        return Err(invalid("must be between 1 and 4294967295".to_string()));
    }
    Ok(value)
}

/// `<project>/data/nutriscan.db`, resolved relative to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutriscan.db");
    path
}
