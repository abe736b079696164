//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::model::{ChartDimensions, ModelOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub model: ModelOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the dataset comes from
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// File path or http(s) URL
    #[serde(default = "default_dataset_location")]
    pub location: String,
}

fn default_dataset_location() -> String {
    "data/pdsi.csv".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            location: default_dataset_location(),
        }
    }
}

/// Chart geometry and decoration
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Outer size and margins, read from the `[chart]` table itself
    #[serde(flatten)]
    pub dimensions: ChartDimensions,

    #[serde(default = "default_annotate_boundary")]
    pub annotate_boundary: bool,
}

fn default_annotate_boundary() -> bool {
    true
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dimensions: ChartDimensions::default(),
            annotate_boundary: default_annotate_boundary(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("droughtline").join("config.toml")),
            Some(PathBuf::from("./droughtline.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `DROUGHTLINE_*` overrides from a variable lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(location) = lookup("DROUGHTLINE_DATASET") {
            self.dataset.location = location;
        }
        if let Some(boundary) = lookup("DROUGHTLINE_BOUNDARY_YEAR") {
            match boundary.parse() {
                Ok(b) => self.model.boundary_year = b,
                Err(e) => tracing::warn!("Ignoring DROUGHTLINE_BOUNDARY_YEAR: {}", e),
            }
        }
        if let Some(level) = lookup("DROUGHTLINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DROUGHTLINE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Droughtline Configuration
#
# Environment variables override these settings:
# - DROUGHTLINE_DATASET
# - DROUGHTLINE_BOUNDARY_YEAR
# - DROUGHTLINE_LOG_LEVEL
# - DROUGHTLINE_LOG_FORMAT

[dataset]
# File path or http(s) URL of the monthly drought CSV
location = "data/pdsi.csv"

[chart]
# Outer size of the chart
width = 1100
height = 1100

# Draw the note next to the boundary year
annotate_boundary = true

[chart.margin]
top = 20
right = 20
bottom = 20
left = 10

[model]
# Partial year with a single month: "earliest", "latest" or a year number
boundary_year = "earliest"

# Years missing months: "reject" (fail) or "skip" (drop the year)
incomplete_years = "reject"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
