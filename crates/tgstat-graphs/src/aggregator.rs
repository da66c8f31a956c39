//! Period aggregation for chart data
//!
//! Groups posts into day/week/month/quarter buckets with summed counters.
//! The per-bucket engagement rate is the rate of the summed counters
//! (ratio of sums), which is what the trend charts plot; it deliberately
//! differs from the mean-of-ratios `avg_er` used by the stat tiles.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tgstat_common::Post;
use tracing::debug;

/// Chart aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
}

impl Granularity {
    /// Tag used in config and locale lookups
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    /// Bucket key for a date. Keys sort chronologically as strings within
    /// a granularity.
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            // A week is keyed by its Monday
            Self::Week => {
                let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                monday.format("%Y-%m-%d").to_string()
            }
            Self::Month => date.format("%Y-%m").to_string(),
            Self::Quarter => format!("{} Q{}", date.year(), (date.month0() / 3) + 1),
        }
    }
}

/// Summed metrics for one chart period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Period key, e.g. "2024-01-15", "2024-01" or "2024 Q1"
    pub period: String,
    pub posts: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub reposts: u64,
    /// Engagement rate of the bucket totals
    pub er: f64,
}

/// Group posts into period buckets ordered by period key.
///
/// Posts without any usable date are skipped.
pub fn aggregate_periods(posts: &[Post], granularity: Granularity) -> Vec<PeriodBucket> {
    let mut buckets: HashMap<String, PeriodBucket> = HashMap::new();

    for post in posts {
        let Some(date) = post.date.or_else(|| post.published_at.map(|dt| dt.date_naive())) else {
            continue;
        };
        let key = granularity.period_key(date);
        let bucket = buckets.entry(key.clone()).or_insert_with(|| PeriodBucket {
            period: key,
            ..Default::default()
        });
        bucket.posts += 1;
        bucket.views += post.views;
        bucket.likes += post.likes;
        bucket.comments += post.comments;
        bucket.reposts += post.reposts;
    }

    let mut result: Vec<PeriodBucket> = buckets
        .into_values()
        .map(|mut bucket| {
            bucket.er = tgstat_common::utils::engagement_rate(
                bucket.likes,
                bucket.comments,
                bucket.reposts,
                bucket.views,
            );
            bucket
        })
        .collect();

    result.sort_by(|a, b| a.period.cmp(&b.period));

    debug!(
        buckets = result.len(),
        granularity = granularity.tag(),
        "Aggregated chart periods"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(day: NaiveDate, views: u64, likes: u64) -> Post {
        Post {
            id: 0,
            date: Some(day),
            published_at: None,
            title: String::new(),
            views,
            likes,
            comments: 0,
            reposts: 0,
        }
    }

    #[test]
    fn test_period_keys() {
        let d = date(2024, 2, 14); // a Wednesday
        assert_eq!(Granularity::Day.period_key(d), "2024-02-14");
        assert_eq!(Granularity::Week.period_key(d), "2024-02-12"); // its Monday
        assert_eq!(Granularity::Month.period_key(d), "2024-02");
        assert_eq!(Granularity::Quarter.period_key(d), "2024 Q1");

        assert_eq!(Granularity::Quarter.period_key(date(2024, 10, 1)), "2024 Q4");
    }

    #[test]
    fn test_week_key_is_stable_across_the_week() {
        let monday = date(2024, 2, 12);
        let sunday = date(2024, 2, 18);
        assert_eq!(
            Granularity::Week.period_key(monday),
            Granularity::Week.period_key(sunday)
        );
        assert_ne!(
            Granularity::Week.period_key(monday),
            Granularity::Week.period_key(date(2024, 2, 19))
        );
    }

    #[test]
    fn test_aggregate_sums_and_orders() {
        let posts = vec![
            post(date(2024, 1, 2), 100, 10),
            post(date(2024, 1, 2), 200, 20),
            post(date(2024, 1, 1), 50, 5),
        ];
        let buckets = aggregate_periods(&posts, Granularity::Day);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2024-01-01");
        assert_eq!(buckets[0].posts, 1);
        assert_eq!(buckets[1].period, "2024-01-02");
        assert_eq!(buckets[1].posts, 2);
        assert_eq!(buckets[1].views, 300);
        assert_eq!(buckets[1].likes, 30);
    }

    #[test]
    fn test_bucket_er_is_ratio_of_sums() {
        // Post A: 20/100, post B: 10/1000. Ratio of sums: 30/1100 ≈ 2.727%.
        // The mean of per-post rates (10.5%) must NOT appear here.
        let posts = vec![
            post(date(2024, 1, 1), 100, 20),
            post(date(2024, 1, 1), 1000, 10),
        ];
        let buckets = aggregate_periods(&posts, Granularity::Day);
        assert_eq!(buckets.len(), 1);
        assert!((buckets[0].er - 30.0 / 1100.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_er_zero_views() {
        let posts = vec![post(date(2024, 1, 1), 0, 10)];
        let buckets = aggregate_periods(&posts, Granularity::Day);
        assert_eq!(buckets[0].er, 0.0);
    }

    #[test]
    fn test_undated_posts_are_skipped() {
        let mut undated = post(date(2024, 1, 1), 100, 0);
        undated.date = None;
        let buckets = aggregate_periods(&[undated], Granularity::Day);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_periods(&[], Granularity::Month).is_empty());
    }
}
