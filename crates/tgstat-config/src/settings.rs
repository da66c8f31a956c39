//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Telegram gateway configuration
    #[validate]
    pub telegram: TelegramConfig,

    /// Dashboard behavior configuration
    #[validate]
    pub dashboard: DashboardConfig,

    /// Graph rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// Telegram gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TelegramConfig {
    /// History gateway base URL
    #[validate(url(message = "Gateway URL must be a valid URL"))]
    pub gateway_url: String,

    /// Optional path to a dotenv-style file holding TG_SESSION
    pub env_file: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,

    /// Requests per second against the gateway
    #[validate(range(min = 1, max = 50, message = "Rate limit must be between 1 and 50"))]
    pub rate_limit_per_sec: u32,
}

/// Dashboard behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    /// Default channel link or username
    #[validate(custom(function = "crate::validation::validate_channel", message = "Invalid channel identifier"))]
    pub channel: String,

    /// Maximum number of messages scanned per fetch
    #[validate(range(min = 1, max = 10000, message = "Fetch limit must be between 1 and 10000"))]
    pub fetch_limit: usize,

    /// Output directory for the generated dashboard
    pub output_dir: String,

    /// Directory for the request log
    pub log_dir: String,

    /// Requester identifier recorded in the request log
    pub requester: String,

    /// Locale for weekday and period labels ("en" or "ru")
    #[validate(custom(function = "crate::validation::validate_locale", message = "Locale must be 'en' or 'ru'"))]
    pub locale: String,
}

/// Graph rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    /// Graph width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Graph height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be a valid hex color"))]
    pub background_color: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use pretty console output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            dashboard: DashboardConfig::default(),
            graph: GraphConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validate the entire configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8552".to_string(),
            env_file: Some("idandhash.env".to_string()),
            timeout_seconds: 30,
            max_retries: 3,
            rate_limit_per_sec: 5,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            fetch_limit: 1000,
            output_dir: "dashboard".to_string(),
            log_dir: "logs".to_string(),
            requester: "dashboard_user".to_string(),
            locale: "en".to_string(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 235,
            background_color: "#FFFFFF".to_string(),
            font_size: 13,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            pretty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        // The default channel is empty, which is allowed until a fetch is requested
        let config = Config::default();
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_invalid_gateway_url() {
        let mut config = Config::default();
        config.telegram.gateway_url = "not a url".to_string();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_invalid_graph_dimensions() {
        let mut config = Config::default();
        config.graph.width = 10;
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_invalid_background_color() {
        let mut config = Config::default();
        config.graph.background_color = "white".to_string();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_invalid_locale() {
        let mut config = Config::default();
        config.dashboard.locale = "de".to_string();
        assert!(config.validate_all().is_err());
    }
}
