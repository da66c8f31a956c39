//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Regex for channel usernames: letters, digits and underscores, 5-32 chars
static CHANNEL_USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]{4,31}$").expect("Invalid channel username regex pattern")
});

/// Validate a channel identifier.
///
/// Accepts an empty value (no default channel configured), a `t.me` link,
/// an `@handle` or a bare username.
pub fn validate_channel(channel: &str) -> Result<(), ValidationError> {
    if channel.is_empty() {
        return Ok(());
    }

    let username = tgstat_common::utils::extract_channel_username(channel);
    if CHANNEL_USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_channel_username"))
    }
}

/// Validate a locale tag
pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    match locale {
        "en" | "ru" => Ok(()),
        _ => Err(ValidationError::new("unsupported_locale")),
    }
}

/// Validate a log level string
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}
