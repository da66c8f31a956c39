//! Session token bootstrap for the Telegram gateway.
//!
//! The dashboard authenticates with a long-lived session string generated
//! once out of band. The token is read from the `TG_SESSION` environment
//! variable or from a dotenv-style file, in that order.

use crate::error::{Result, TgStatError};
use std::path::Path;
use tracing::debug;

/// Environment variable holding the session string
pub const SESSION_ENV_VAR: &str = "TG_SESSION";

/// An opaque Telegram session string.
///
/// Never logged in full; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw session string, rejecting empty input
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TgStatError::auth(
                "Session string is empty. Generate a session and set TG_SESSION.",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw session string, for use in request headers
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Load the session from the environment, falling back to an env file.
    ///
    /// The env-file fallback parses `TG_SESSION=...` lines directly so a
    /// missing process environment still works for operators who only keep
    /// the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        if let Ok(value) = std::env::var(SESSION_ENV_VAR) {
            if !value.trim().is_empty() {
                debug!("Session loaded from environment");
                return Self::new(value);
            }
        }

        if let Some(path) = env_file {
            if path.exists() {
                if let Some(value) = Self::read_from_env_file(path)? {
                    debug!("Session loaded from {}", path.display());
                    return Self::new(value);
                }
            }
            return Err(TgStatError::auth(format!(
                "TG_SESSION not found in environment or {}. Generate a session first.",
                path.display()
            )));
        }

        Err(TgStatError::auth(
            "TG_SESSION not set. Generate a session and export it before running.",
        ))
    }

    /// Scan a dotenv-style file for the session line, stripping quotes
    fn read_from_env_file(path: &Path) -> Result<Option<String>> {
        let content = std::fs::read_to_string(path)?;
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix(&format!("{}=", SESSION_ENV_VAR)) {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                    .unwrap_or(value);
                return Ok(Some(value.to_string()));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_rejects_empty() {
        assert!(SessionToken::new("").is_err());
        assert!(SessionToken::new("   ").is_err());
        assert!(SessionToken::new("abc123").is_ok());
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("super-secret").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_read_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "API_ID=12345").unwrap();
        writeln!(file, "TG_SESSION=\"quoted-token\"").unwrap();

        let value = SessionToken::read_from_env_file(&path).unwrap();
        assert_eq!(value.as_deref(), Some("quoted-token"));
    }

    #[test]
    fn test_read_from_env_file_single_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.env");
        std::fs::write(&path, "TG_SESSION='tok'\n").unwrap();

        let value = SessionToken::read_from_env_file(&path).unwrap();
        assert_eq!(value.as_deref(), Some("tok"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.env");
        // Only run the file path branch; the env var may be set on dev machines
        if std::env::var(SESSION_ENV_VAR).is_err() {
            let result = SessionToken::load(Some(&path));
            assert!(result.is_err());
            let message = result.unwrap_err().to_string();
            assert!(message.contains("TG_SESSION"));
        }
    }
}
