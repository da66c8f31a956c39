//! Append-only request log
//!
//! One JSON object per line in `logs/stat_requests.log`. Logging is a side
//! concern: a write failure is reported to the diagnostic stream and
//! swallowed so it can never abort a statistics request.

use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tgstat_common::DateRange;
use tracing::warn;

/// File name of the request log inside the log directory
pub const REQUEST_LOG_FILE: &str = "stat_requests.log";

/// One logged statistics request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    /// Wall-clock time in Moscow (UTC+3)
    pub timestamp_msk: String,
    /// Requester identifier
    pub login: String,
    pub start_date: String,
    pub end_date: String,
    pub event: String,
    pub source: String,
}

impl RequestLogEntry {
    /// Entry for a statistics fetch request
    pub fn fetch(range: &DateRange, login: impl Into<String>) -> Self {
        Self {
            timestamp_msk: moscow_timestamp(),
            login: login.into(),
            start_date: range.start.to_string(),
            end_date: range.end.to_string(),
            event: "fetch_statistics".to_string(),
            source: "dashboard".to_string(),
        }
    }
}

/// Current time in Moscow (UTC+3), formatted for the log
pub fn moscow_timestamp() -> String {
    let moscow = FixedOffset::east_opt(3 * 3600).expect("UTC+3 is a valid offset");
    Utc::now()
        .with_timezone(&moscow)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Append a statistics request to the log.
///
/// Returns `true` when the line was written. Failures are logged via
/// `tracing::warn!` and reported as `false`, never as an error.
pub fn log_statistics_request(log_dir: &Path, range: &DateRange, login: &str) -> bool {
    let entry = RequestLogEntry::fetch(range, login);
    match append_entry(log_dir, &entry) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to log statistics request: {}", e);
            false
        }
    }
}

fn append_entry(log_dir: &Path, entry: &RequestLogEntry) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(REQUEST_LOG_FILE);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
    writeln!(file, "{}", line)
}
