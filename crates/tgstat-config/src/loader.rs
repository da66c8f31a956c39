//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::Path;
use thiserror::Error;
use tgstat_common::Result as TgStatResult;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for tgstat_common::TgStatError {
    fn from(err: ConfigError) -> Self {
        tgstat_common::TgStatError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all().map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Load configuration from environment variables and files.
    ///
    /// Resolution order: `TGSTAT_CONFIG_PATH`, then `config.yaml` /
    /// `config.yml` in the working directory, then built-in defaults.
    pub fn load() -> TgStatResult<Config> {
        let config = if let Ok(config_path) = env::var("TGSTAT_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TgStatResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Telegram gateway overrides
        if let Ok(url) = env::var("TGSTAT_GATEWAY_URL") {
            config.telegram.gateway_url = url;
        }

        if let Ok(env_file) = env::var("TGSTAT_ENV_FILE") {
            config.telegram.env_file = Some(env_file);
        }

        if let Ok(timeout) = env::var("TGSTAT_TIMEOUT") {
            config.telegram.timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "TGSTAT_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(retries) = env::var("TGSTAT_MAX_RETRIES") {
            config.telegram.max_retries =
                retries.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "TGSTAT_MAX_RETRIES".to_string(),
                    source: Box::new(e),
                })?;
        }

        // Dashboard overrides
        if let Ok(channel) = env::var("TGSTAT_CHANNEL") {
            config.dashboard.channel = channel;
        }

        if let Ok(limit) = env::var("TGSTAT_FETCH_LIMIT") {
            config.dashboard.fetch_limit =
                limit.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "TGSTAT_FETCH_LIMIT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(output_dir) = env::var("TGSTAT_OUTPUT_DIR") {
            config.dashboard.output_dir = output_dir;
        }

        if let Ok(locale) = env::var("TGSTAT_LOCALE") {
            config.dashboard.locale = locale;
        }

        // Graph overrides
        if let Ok(width) = env::var("TGSTAT_GRAPH_WIDTH") {
            config.graph.width = width.parse().map_err(|e| ConfigError::EnvParseError {
                var: "TGSTAT_GRAPH_WIDTH".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(height) = env::var("TGSTAT_GRAPH_HEIGHT") {
            config.graph.height = height.parse().map_err(|e| ConfigError::EnvParseError {
                var: "TGSTAT_GRAPH_HEIGHT".to_string(),
                source: Box::new(e),
            })?;
        }

        // Logging overrides
        if let Ok(level) = env::var("TGSTAT_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
