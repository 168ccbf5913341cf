//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::SCORE_EPSILON;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Numeric settings for the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Score differences within this tolerance are ties
    #[serde(default = "default_score_epsilon")]
    pub score_epsilon: f64,

    /// Exponent for Pythagorean expected wins
    #[serde(default = "default_pythagorean_exponent")]
    pub pythagorean_exponent: f64,

    /// Count playoff games in head-to-head records
    #[serde(default = "default_head_to_head_includes_playoffs")]
    pub head_to_head_includes_playoffs: bool,
}

fn default_score_epsilon() -> f64 {
    SCORE_EPSILON
}

fn default_pythagorean_exponent() -> f64 {
    2.37
}

fn default_head_to_head_includes_playoffs() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            score_epsilon: default_score_epsilon(),
            pythagorean_exponent: default_pythagorean_exponent(),
            head_to_head_includes_playoffs: default_head_to_head_includes_playoffs(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let eps = self.analysis.score_epsilon;
        if !eps.is_finite() || !(0.0..1.0).contains(&eps) {
            return Err(ConfigError::ValidationError(format!(
                "Score epsilon must be in [0, 1), got {}",
                eps
            )));
        }

        let exp = self.analysis.pythagorean_exponent;
        if !exp.is_finite() || exp <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "Pythagorean exponent must be positive, got {}",
                exp
            )));
        }

        Ok(())
    }
}
