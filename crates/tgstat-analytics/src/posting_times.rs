//! Posting-time analysis: slot bucketing, rankings and conflict detection
//!
//! Posts are grouped into (weekday, hour) slots by their publication time.
//! Each non-empty slot gets mean/median view statistics, a mean engagement
//! rate and a stability label; slots are then ranked for reach and for
//! engagement, and a conflict is flagged when the two rankings disagree on
//! the best slot.

use crate::locale::Locale;
use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tgstat_common::Post;
use tracing::debug;

/// Below this many posts the date-span gate applies
const MIN_POSTS: usize = 10;

/// Minimum calendar span (days) for a small sample to be trusted
const MIN_DAYS_SPAN: i64 = 14;

/// Entries kept in each best/worst ranking
const RANKING_SIZE: usize = 3;

/// A slot is stable when `stddev < STABILITY_FACTOR * mean` of its views
const STABILITY_FACTOR: f64 = 0.3;

/// Dispersion label for view counts within a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Stable,
    Unstable,
    /// Fewer than two samples, dispersion unknown
    Insufficient,
}

/// A formatted (weekday, hour) slot for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotInfo {
    /// Localized weekday name
    pub day: String,
    /// Weekday index, 0 = Monday .. 6 = Sunday
    pub day_num: u8,
    /// Hour of day, 0-23
    pub hour: u8,
    /// Display window around the hour, e.g. "17:00–20:00"
    pub time_range: String,
}

/// One ranked slot with its metric value and context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecommendation {
    pub slot: SlotInfo,
    /// Mean of the ranked metric in this slot
    pub value: f64,
    /// Overall mean of the same metric across all posts
    pub overall: f64,
    /// `(value - overall) / overall * 100`, 0 when the overall mean is 0
    pub percent_diff: f64,
    pub posts_count: usize,
    pub stability: Stability,
}

/// The two disagreeing slots when reach and engagement conflict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictInfo {
    /// Best slot for reach (mean views)
    pub views: SlotInfo,
    /// Best slot for engagement rate
    pub er: SlotInfo,
}

/// Full recommendation set for a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingReport {
    pub overall_avg_views: f64,
    pub overall_avg_er: f64,
    pub best_views: Vec<SlotRecommendation>,
    pub worst_views: Vec<SlotRecommendation>,
    pub best_er: Vec<SlotRecommendation>,
    pub worst_er: Vec<SlotRecommendation>,
    pub has_conflict: bool,
    pub conflict: Option<ConflictInfo>,
    pub total_posts: usize,
    pub total_slots: usize,
}

/// Outcome of a posting-time analysis.
///
/// These three variants are the only terminal outcomes; malformed posts are
/// skipped during bucketing and never surface as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostingAnalysis {
    /// No posts, or nothing bucketable
    NoData,
    /// Too few posts over too short a span for reliable rankings
    InsufficientData { posts_count: usize, days_range: i64 },
    Ready(PostingReport),
}

/// Per-slot sample accumulators
#[derive(Debug, Default)]
struct SlotSamples {
    views: Vec<f64>,
    er: Vec<f64>,
}

/// Per-slot derived statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStats {
    pub avg_views: f64,
    /// Upper median of the slot's view counts
    pub median_views: f64,
    pub avg_er: f64,
    pub posts_count: usize,
    pub stability: Stability,
}

/// Analyze posts by publication time and produce posting recommendations.
///
/// The sufficiency gate is a fixed-policy heuristic, not a statistical
/// test: fewer than 10 posts spanning under 14 calendar days yield an
/// `InsufficientData` verdict rather than misleading rankings.
pub fn analyze_posting_times(posts: &[Post], locale: Locale) -> PostingAnalysis {
    if posts.is_empty() {
        return PostingAnalysis::NoData;
    }

    if posts.len() < MIN_POSTS {
        let dates: Vec<_> = posts.iter().filter_map(|p| p.date).collect();
        if let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) {
            let days_range = (*max - *min).num_days();
            if days_range < MIN_DAYS_SPAN {
                return PostingAnalysis::InsufficientData {
                    posts_count: posts.len(),
                    days_range,
                };
            }
        }
    }

    // Bucket by (weekday, hour); posts without a usable timestamp are dropped
    let mut samples: HashMap<(u8, u8), SlotSamples> = HashMap::new();
    for post in posts {
        let Some(key) = slot_key(post) else {
            continue;
        };
        let slot = samples.entry(key).or_default();
        slot.views.push(post.views as f64);
        slot.er.push(post.engagement_rate());
    }

    if samples.is_empty() {
        return PostingAnalysis::NoData;
    }

    let stats: Vec<((u8, u8), SlotStats)> = samples
        .iter()
        .map(|(key, slot)| (*key, slot_stats(slot)))
        .collect();

    // Global baselines over every individual sample, not per-slot means
    let all_views: Vec<f64> = samples.values().flat_map(|s| s.views.iter().copied()).collect();
    let all_er: Vec<f64> = samples.values().flat_map(|s| s.er.iter().copied()).collect();
    let overall_avg_views = mean(&all_views);
    let overall_avg_er = mean(&all_er);

    let best_views = rank(&stats, |s| s.avg_views, true);
    let worst_views = rank(&stats, |s| s.avg_views, false);
    let best_er = rank(&stats, |s| s.avg_er, true);
    let worst_er = rank(&stats, |s| s.avg_er, false);

    let best_views_key = best_views.first().map(|(key, _)| *key);
    let best_er_key = best_er.first().map(|(key, _)| *key);
    let has_conflict = best_views_key != best_er_key;

    let conflict = match (has_conflict, best_views_key, best_er_key) {
        (true, Some(views_key), Some(er_key)) => Some(ConflictInfo {
            views: format_slot(views_key, locale),
            er: format_slot(er_key, locale),
        }),
        _ => None,
    };

    debug!(
        slots = stats.len(),
        has_conflict, "Posting-time analysis complete"
    );

    PostingAnalysis::Ready(PostingReport {
        overall_avg_views,
        overall_avg_er,
        best_views: recommend(&best_views, |s| s.avg_views, overall_avg_views, locale),
        worst_views: recommend(&worst_views, |s| s.avg_views, overall_avg_views, locale),
        best_er: recommend(&best_er, |s| s.avg_er, overall_avg_er, locale),
        worst_er: recommend(&worst_er, |s| s.avg_er, overall_avg_er, locale),
        has_conflict,
        conflict,
        total_posts: posts.len(),
        total_slots: stats.len(),
    })
}

/// Slot key for a post: full timestamp preferred, date-only falls back to
/// midnight, neither means the post is skipped.
fn slot_key(post: &Post) -> Option<(u8, u8)> {
    if let Some(published_at) = post.published_at {
        let weekday = published_at.weekday().num_days_from_monday() as u8;
        let hour = published_at.hour() as u8;
        return Some((weekday, hour));
    }
    post.date
        .map(|date| (date.weekday().num_days_from_monday() as u8, 0))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Derive statistics for one slot's samples
fn slot_stats(slot: &SlotSamples) -> SlotStats {
    let avg_views = mean(&slot.views);
    let avg_er = mean(&slot.er);

    // Upper median: middle element of the ascending-sorted list at len/2.
    // For even-sized lists this is the upper of the two middle elements.
    let mut sorted = slot.views.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median_views = sorted[sorted.len() / 2];

    let stability = if slot.views.len() < 2 {
        Stability::Insufficient
    } else {
        let variance = slot
            .views
            .iter()
            .map(|v| (v - avg_views).powi(2))
            .sum::<f64>()
            / slot.views.len() as f64;
        if variance.sqrt() < avg_views * STABILITY_FACTOR {
            Stability::Stable
        } else {
            Stability::Unstable
        }
    };

    SlotStats {
        avg_views,
        median_views,
        avg_er,
        posts_count: slot.views.len(),
        stability,
    }
}

/// Top slots by the given metric. Ties are broken by ascending slot key
/// (weekday, hour) so rankings are deterministic.
fn rank<'a>(
    stats: &'a [((u8, u8), SlotStats)],
    metric: impl Fn(&SlotStats) -> f64,
    descending: bool,
) -> Vec<((u8, u8), &'a SlotStats)> {
    let mut ranked: Vec<_> = stats.iter().map(|(key, s)| (*key, s)).collect();
    ranked.sort_by(|a, b| {
        let ordering = metric(a.1)
            .partial_cmp(&metric(b.1))
            .unwrap_or(Ordering::Equal);
        let ordering = if descending { ordering.reverse() } else { ordering };
        ordering.then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(RANKING_SIZE);
    ranked
}

/// Build display entries for a ranking
fn recommend(
    ranked: &[((u8, u8), &SlotStats)],
    metric: impl Fn(&SlotStats) -> f64,
    overall: f64,
    locale: Locale,
) -> Vec<SlotRecommendation> {
    ranked
        .iter()
        .map(|(key, stats)| {
            let value = metric(stats);
            let percent_diff = if overall > 0.0 {
                (value - overall) / overall * 100.0
            } else {
                0.0
            };
            SlotRecommendation {
                slot: format_slot(*key, locale),
                value,
                overall,
                percent_diff,
                posts_count: stats.posts_count,
                stability: stats.stability,
            }
        })
        .collect()
}

/// Format a slot key for display: localized weekday plus an hour window of
/// `[hour-1, hour+2)` clamped to the day.
fn format_slot((day_num, hour): (u8, u8), locale: Locale) -> SlotInfo {
    let start = hour.saturating_sub(1);
    let end = (hour + 1).min(23);
    SlotInfo {
        day: locale.weekday_name(weekday_from_index(day_num)).to_string(),
        day_num,
        hour,
        time_range: format!("{:02}:00–{:02}:00", start, end + 1),
    }
}

fn weekday_from_index(index: u8) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tgstat_common::Post;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Post published `days` after Monday 2024-01-01 at the given hour
    fn post_on(days: i64, hour: u32, views: u64, likes: u64) -> Post {
        let day = date(2024, 1, 1) + Duration::days(days);
        let published_at = day.and_hms_opt(hour, 30, 0).unwrap().and_utc();
        Post {
            id: 0,
            date: Some(day),
            published_at: Some(published_at),
            title: String::new(),
            views,
            likes,
            comments: 0,
            reposts: 0,
        }
    }

    fn dated_post(y: i32, m: u32, d: u32, views: u64) -> Post {
        Post {
            id: 0,
            date: Some(date(y, m, d)),
            published_at: None,
            title: String::new(),
            views,
            likes: 0,
            comments: 0,
            reposts: 0,
        }
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert_eq!(analyze_posting_times(&[], Locale::En), PostingAnalysis::NoData);
    }

    #[test]
    fn test_small_sample_short_span_is_insufficient() {
        let posts = vec![
            dated_post(2024, 1, 1, 100),
            dated_post(2024, 1, 3, 120),
            dated_post(2024, 1, 5, 90),
        ];
        let result = analyze_posting_times(&posts, Locale::En);
        assert_eq!(
            result,
            PostingAnalysis::InsufficientData {
                posts_count: 3,
                days_range: 4,
            }
        );
    }

    #[test]
    fn test_small_sample_long_span_is_analyzed() {
        // Four Mondays at 10:00, spanning three weeks
        let posts = vec![
            post_on(0, 10, 10, 1),
            post_on(7, 10, 20, 1),
            post_on(14, 10, 30, 1),
            post_on(21, 10, 40, 1),
        ];
        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert_eq!(report.total_posts, 4);
        assert_eq!(report.total_slots, 1);
    }

    #[test]
    fn test_undated_posts_are_dropped_and_all_undated_is_no_data() {
        let undated = Post {
            id: 1,
            date: None,
            published_at: None,
            title: String::new(),
            views: 500,
            likes: 50,
            comments: 0,
            reposts: 0,
        };
        // Gate needs >= 10 posts to fall through to bucketing
        let posts: Vec<Post> = std::iter::repeat(undated).take(12).collect();
        assert_eq!(analyze_posting_times(&posts, Locale::En), PostingAnalysis::NoData);
    }

    #[test]
    fn test_upper_median_for_even_sized_slot() {
        // One slot with views [10, 20, 30, 40]: upper median is 30
        let posts = vec![
            post_on(0, 10, 10, 0),
            post_on(7, 10, 20, 0),
            post_on(14, 10, 30, 0),
            post_on(21, 10, 40, 0),
        ];
        let mut samples = SlotSamples::default();
        for post in &posts {
            samples.views.push(post.views as f64);
            samples.er.push(post.engagement_rate());
        }
        let stats = slot_stats(&samples);
        assert_eq!(stats.median_views, 30.0);
        assert_eq!(stats.avg_views, 25.0);
    }

    #[test]
    fn test_stability_classification() {
        // Identical views: stddev 0, stable
        let stable = SlotSamples {
            views: vec![100.0, 100.0, 100.0],
            er: vec![0.0, 0.0, 0.0],
        };
        assert_eq!(slot_stats(&stable).stability, Stability::Stable);

        // Single sample: insufficient
        let single = SlotSamples {
            views: vec![100.0],
            er: vec![0.0],
        };
        assert_eq!(slot_stats(&single).stability, Stability::Insufficient);

        // Wildly dispersed views: unstable
        let unstable = SlotSamples {
            views: vec![10.0, 1000.0],
            er: vec![0.0, 0.0],
        };
        assert_eq!(slot_stats(&unstable).stability, Stability::Unstable);
    }

    #[test]
    fn test_stability_all_zero_views_is_unstable() {
        // stddev 0 is not strictly below 0.3 * mean when the mean is 0
        let zeros = SlotSamples {
            views: vec![0.0, 0.0],
            er: vec![0.0, 0.0],
        };
        assert_eq!(slot_stats(&zeros).stability, Stability::Unstable);
    }

    #[test]
    fn test_conflict_between_reach_and_engagement() {
        // Mondays 09:00: high reach, low engagement
        // Tuesdays 18:00: low reach, high engagement
        let mut posts = Vec::new();
        for week in 0..5 {
            posts.push(post_on(week * 7, 9, 1000, 1));
            posts.push(post_on(week * 7 + 1, 18, 100, 50));
        }

        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };

        assert!(report.has_conflict);
        let conflict = report.conflict.expect("conflict info must be attached");
        assert_eq!(conflict.views.day_num, 0); // Monday
        assert_eq!(conflict.views.hour, 9);
        assert_eq!(conflict.er.day_num, 1); // Tuesday
        assert_eq!(conflict.er.hour, 18);
        assert_ne!(conflict.views, conflict.er);

        assert_eq!(report.best_views[0].slot.day_num, 0);
        assert_eq!(report.best_er[0].slot.day_num, 1);
    }

    #[test]
    fn test_no_conflict_when_one_slot_wins_both() {
        let mut posts = Vec::new();
        for week in 0..5 {
            // Monday wins views and engagement
            posts.push(post_on(week * 7, 9, 1000, 500));
            posts.push(post_on(week * 7 + 1, 18, 100, 1));
        }

        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert!(!report.has_conflict);
        assert!(report.conflict.is_none());
    }

    #[test]
    fn test_rankings_capped_at_three() {
        let mut posts = Vec::new();
        // Five distinct slots across enough posts to pass the gate
        for week in 0..3i64 {
            for day in 0..5i64 {
                posts.push(post_on(
                    week * 7 + day,
                    9 + day as u32,
                    100 + 50 * day as u64,
                    day as u64,
                ));
            }
        }
        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert_eq!(report.total_slots, 5);
        assert_eq!(report.best_views.len(), 3);
        assert_eq!(report.worst_views.len(), 3);
        assert_eq!(report.best_er.len(), 3);
        assert_eq!(report.worst_er.len(), 3);
    }

    #[test]
    fn test_fewer_slots_than_ranking_size() {
        let posts = vec![
            post_on(0, 10, 10, 0),
            post_on(7, 10, 20, 0),
            post_on(21, 10, 40, 0),
        ];
        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert_eq!(report.best_views.len(), 1);
        assert_eq!(report.worst_views.len(), 1);
    }

    #[test]
    fn test_deterministic_tie_break() {
        // Two slots with identical means; the earlier (weekday, hour) key wins
        let posts = vec![
            post_on(0, 9, 100, 5),   // Monday 09
            post_on(7, 9, 100, 5),   // Monday 09
            post_on(1, 18, 100, 5),  // Tuesday 18
            post_on(22, 18, 100, 5), // Tuesday 18
        ];
        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert_eq!(report.best_views[0].slot.day_num, 0);
        assert_eq!(report.best_views[1].slot.day_num, 1);
        // Identical values in both rankings: no conflict
        assert!(!report.has_conflict);
    }

    #[test]
    fn test_overall_baseline_flattens_samples() {
        // Slot A: 9 posts of 100 views; slot B: 1 post of 1000 views.
        // Flattened mean is 190, not the 550 a mean-of-slot-means would give.
        let mut posts = Vec::new();
        for week in 0..9 {
            posts.push(post_on(week * 7, 9, 100, 0));
        }
        posts.push(post_on(1, 18, 1000, 0));

        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        assert!((report.overall_avg_views - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_diff_against_overall() {
        let mut posts = Vec::new();
        for week in 0..9 {
            posts.push(post_on(week * 7, 9, 100, 0));
        }
        posts.push(post_on(1, 18, 1000, 0));

        let PostingAnalysis::Ready(report) = analyze_posting_times(&posts, Locale::En) else {
            panic!("expected a full report");
        };
        // Best slot averages 1000 views against an overall mean of 190
        let best = &report.best_views[0];
        assert!((best.percent_diff - (1000.0 - 190.0) / 190.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_window_formatting() {
        let midnight = format_slot((0, 0), Locale::En);
        assert_eq!(midnight.time_range, "00:00–02:00");

        let evening = format_slot((2, 23), Locale::En);
        assert_eq!(evening.time_range, "22:00–24:00");

        let midday = format_slot((4, 12), Locale::En);
        assert_eq!(midday.time_range, "11:00–14:00");
    }

    #[test]
    fn test_slot_key_prefers_full_timestamp() {
        let post = post_on(2, 17, 100, 0); // Wednesday 17:00
        assert_eq!(slot_key(&post), Some((2, 17)));

        let fallback = dated_post(2024, 1, 3, 100); // Wednesday, midnight fallback
        assert_eq!(slot_key(&fallback), Some((2, 0)));

        let undated = Post {
            id: 0,
            date: None,
            published_at: None,
            title: String::new(),
            views: 0,
            likes: 0,
            comments: 0,
            reposts: 0,
        };
        assert_eq!(slot_key(&undated), None);
    }

    #[test]
    fn test_localized_weekday_names() {
        let slot = format_slot((0, 9), Locale::Ru);
        assert_eq!(slot.day, "Понедельник");

        let slot = format_slot((6, 9), Locale::En);
        assert_eq!(slot.day, "Sunday");
    }
}
