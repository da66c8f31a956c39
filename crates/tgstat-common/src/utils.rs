//! Utility functions used across the tgstat application

use crate::{Result, Timestamp};

/// Engagement rate primitive: `(likes + comments + reposts) / views * 100`.
///
/// Defined as `0.0` when `views` is zero; never fails.
pub fn engagement_rate(likes: u64, comments: u64, reposts: u64, views: u64) -> f64 {
    if views > 0 {
        (likes + comments + reposts) as f64 / views as f64 * 100.0
    } else {
        0.0
    }
}

/// Extract a channel username from a link or handle.
///
/// Accepts `https://t.me/name`, `@name` or a bare username.
pub fn extract_channel_username(link: &str) -> &str {
    if let Some(rest) = link.strip_prefix("https://t.me/") {
        rest
    } else if let Some(rest) = link.strip_prefix("@") {
        rest
    } else {
        link
    }
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Validate that a string is not empty after trimming
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(crate::TgStatError::validation_field(
            format!("{} cannot be empty", field_name),
            field_name,
        ))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_rate() {
        assert_eq!(engagement_rate(10, 5, 5, 200), 10.0);
        assert_eq!(engagement_rate(0, 0, 0, 100), 0.0);
        assert_eq!(engagement_rate(3, 2, 1, 100), 6.0);
    }

    #[test]
    fn test_engagement_rate_zero_views() {
        assert_eq!(engagement_rate(10, 20, 30, 0), 0.0);
    }

    #[test]
    fn test_extract_channel_username() {
        assert_eq!(extract_channel_username("https://t.me/mychannel"), "mychannel");
        assert_eq!(extract_channel_username("@mychannel"), "mychannel");
        assert_eq!(extract_channel_username("mychannel"), "mychannel");
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("test", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
        assert!(validate_non_empty("   ", "field").is_err());
    }
}
