//! Engagement metrics and posting-time analysis for the tgstat dashboard

pub mod engagement;
pub mod locale;
pub mod metrics;
pub mod posting_times;

pub use engagement::{engagement_rate, format_count};
pub use locale::Locale;
pub use metrics::{
    calculate_metrics, compare_periods, previous_period, MetricDelta, MetricDeltas, PeriodComparison,
    PeriodMetrics,
};
pub use posting_times::{
    analyze_posting_times, ConflictInfo, PostingAnalysis, PostingReport, SlotInfo,
    SlotRecommendation, SlotStats, Stability,
};
