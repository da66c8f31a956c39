//! Period aggregation and period-over-period comparison

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tgstat_common::{DateRange, Post};

/// Aggregated metrics for a period of posts.
///
/// `avg_er` is the arithmetic mean of per-post engagement rates restricted
/// to posts with views, not the engagement rate of the summed counters. The
/// distinction matters and is preserved for compatibility with historical
/// reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub posts: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub reposts: u64,
    pub avg_er: f64,
}

/// Delta between two values of one tracked metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// `current - previous`
    pub absolute: f64,
    /// `absolute / previous * 100`, absent when the previous value is zero
    pub percent: Option<f64>,
}

impl MetricDelta {
    fn between(current: f64, previous: f64) -> Self {
        let absolute = current - previous;
        let percent = if previous != 0.0 {
            Some(absolute / previous * 100.0)
        } else {
            None
        };
        Self { absolute, percent }
    }
}

/// Deltas for each of the six tracked metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub posts: MetricDelta,
    pub views: MetricDelta,
    pub likes: MetricDelta,
    pub comments: MetricDelta,
    pub reposts: MetricDelta,
    pub avg_er: MetricDelta,
}

/// Result of comparing two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: PeriodMetrics,
    pub previous: PeriodMetrics,
    pub deltas: MetricDeltas,
}

/// Aggregate metrics over a sequence of posts.
///
/// Empty input yields all-zero metrics with `avg_er = 0.0`.
pub fn calculate_metrics(posts: &[Post]) -> PeriodMetrics {
    if posts.is_empty() {
        return PeriodMetrics::default();
    }

    let mut metrics = PeriodMetrics {
        posts: posts.len() as u64,
        ..Default::default()
    };

    let mut er_sum = 0.0;
    let mut er_count = 0u64;

    for post in posts {
        metrics.views += post.views;
        metrics.likes += post.likes;
        metrics.comments += post.comments;
        metrics.reposts += post.reposts;

        if post.views > 0 {
            er_sum += post.engagement_rate();
            er_count += 1;
        }
    }

    if er_count > 0 {
        metrics.avg_er = er_sum / er_count as f64;
    }

    metrics
}

/// Compare metrics of two periods, computing absolute and percent deltas.
///
/// Percent deltas are `None` whenever the previous value is exactly zero;
/// no infinite percentages are ever fabricated.
pub fn compare_periods(current_posts: &[Post], previous_posts: &[Post]) -> PeriodComparison {
    let current = calculate_metrics(current_posts);
    let previous = calculate_metrics(previous_posts);

    let deltas = MetricDeltas {
        posts: MetricDelta::between(current.posts as f64, previous.posts as f64),
        views: MetricDelta::between(current.views as f64, previous.views as f64),
        likes: MetricDelta::between(current.likes as f64, previous.likes as f64),
        comments: MetricDelta::between(current.comments as f64, previous.comments as f64),
        reposts: MetricDelta::between(current.reposts as f64, previous.reposts as f64),
        avg_er: MetricDelta::between(current.avg_er, previous.avg_er),
    };

    PeriodComparison {
        current,
        previous,
        deltas,
    }
}

/// The immediately preceding period of identical length.
///
/// The previous range ends the day before `range` starts and spans the same
/// number of days (both endpoints inclusive).
pub fn previous_period(range: &DateRange) -> DateRange {
    let length = range.len_days();
    let prev_end = range.start - Duration::days(1);
    let prev_start = prev_end - Duration::days(length - 1);
    DateRange::new(prev_start, prev_end)
}
