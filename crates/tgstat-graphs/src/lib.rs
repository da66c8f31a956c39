//! Chart generation for the tgstat dashboard

pub mod aggregator;
pub mod metric_trend;
pub mod renderer;
pub mod types;

pub use aggregator::{aggregate_periods, Granularity, PeriodBucket};
pub use metric_trend::{MetricTrendGraph, TrendMetric};
pub use renderer::GraphRenderer;
pub use types::*;
