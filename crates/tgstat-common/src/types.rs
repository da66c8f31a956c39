//! Common types used across the tgstat application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the application
pub type Timestamp = DateTime<Utc>;

/// A single channel post with its engagement counters.
///
/// Immutable once fetched; counters default to zero when the source message
/// does not carry them. `published_at` holds the full publication timestamp
/// and is preferred for time-of-day analysis, `date` is the calendar date
/// fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Message id, unique within a channel
    pub id: i64,
    /// Calendar date of publication
    pub date: Option<NaiveDate>,
    /// Full publication timestamp
    pub published_at: Option<Timestamp>,
    /// Text preview (first 70 characters), may be a placeholder
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub reposts: u64,
}

impl Post {
    /// Engagement rate of this post: `(likes + comments + reposts) / views * 100`,
    /// or `0.0` when the post has no views.
    ///
    /// Computed on demand; the formula is cheap enough that no caching is kept
    /// on the record itself.
    pub fn engagement_rate(&self) -> f64 {
        crate::utils::engagement_rate(self.likes, self.comments, self.reposts, self.views)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, normalizing a reversed pair
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Number of days in the range, counting both endpoints
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether the given date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}
