//! Configuration management for socialgraph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `socialgraph.toml` file
//! 3. User config `~/.config/socialgraph/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph store configuration.
    pub store: StoreConfig,

    /// Default parameters for graph analyses.
    pub analysis: AnalysisConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./socialgraph.toml` (project local)
    /// 2. `~/.config/socialgraph/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("socialgraph.toml").exists() {
            return Self::from_file("socialgraph.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("socialgraph").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SOCIALGRAPH_STORE_PATH") {
            self.store.path = path;
        }
        if let Ok(namespace) = std::env::var("SOCIALGRAPH_NAMESPACE") {
            self.store.namespace = namespace;
        }
        if let Ok(database) = std::env::var("SOCIALGRAPH_DATABASE") {
            self.store.database = database;
        }
        if let Ok(flag) = std::env::var("SOCIALGRAPH_IN_MEMORY") {
            if let Ok(in_memory) = flag.parse() {
                self.store.in_memory = in_memory;
            }
        }
        if let Ok(level) = std::env::var("SOCIALGRAPH_LOG") {
            self.logging.level = level;
        }
    }

    /// Reject analysis defaults that the engine would refuse anyway.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if !(1..=MAX_DEPTH_LIMIT).contains(&analysis.default_max_depth) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_max_depth must be between 1 and {}",
                MAX_DEPTH_LIMIT
            )));
        }
        if !(1..=MAX_RECOMMENDATION_LIMIT).contains(&analysis.default_recommendation_limit) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_recommendation_limit must be between 1 and {}",
                MAX_RECOMMENDATION_LIMIT
            )));
        }
        if !(1..=MAX_MIN_COMMON_FRIENDS).contains(&analysis.default_min_common_friends) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_min_common_friends must be between 1 and {}",
                MAX_MIN_COMMON_FRIENDS
            )));
        }
        if !(MIN_EGO_MAX_NODES..=MAX_EGO_MAX_NODES).contains(&analysis.default_ego_max_nodes) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_ego_max_nodes must be between {} and {}",
                MIN_EGO_MAX_NODES, MAX_EGO_MAX_NODES
            )));
        }
        if self.store.namespace.trim().is_empty() || self.store.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.namespace and store.database must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Graph store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the RocksDB-backed store.
    pub path: String,

    /// SurrealDB namespace.
    pub namespace: String,

    /// SurrealDB database (graph name).
    pub database: String,

    /// Keep the whole graph in memory instead of on disk.
    pub in_memory: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            in_memory: false,
        }
    }
}

impl StoreConfig {
    /// Get the store path.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

/// Default parameters for graph analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Depth ceiling for shortest-path search when none is given.
    pub default_max_depth: usize,

    /// Number of recommendations when none is given.
    pub default_recommendation_limit: usize,

    /// Common-friends threshold when none is given.
    pub default_min_common_friends: usize,

    /// Ego network node cap when none is given.
    pub default_ego_max_nodes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_max_depth: DEFAULT_MAX_DEPTH,
            default_recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            default_min_common_friends: DEFAULT_MIN_COMMON_FRIENDS,
            default_ego_max_nodes: DEFAULT_EGO_MAX_NODES,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}
