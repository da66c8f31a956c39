//! Configuration management for the tgstat dashboard

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{Config, DashboardConfig, GraphConfig, LoggingConfig, TelegramConfig};
