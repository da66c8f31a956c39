//! Metric trend line chart, one image per tracked metric

use crate::aggregator::PeriodBucket;
use crate::renderer::GraphRenderer;
use crate::types::GraphConfig;
use plotters::prelude::*;
use std::path::Path;
use tgstat_analytics::Locale;
use tgstat_common::{Result, TgStatError};

/// Metrics a trend chart can plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    Likes,
    Comments,
    Reposts,
    Posts,
    Views,
    EngagementRate,
}

impl TrendMetric {
    /// All metrics in dashboard display order
    pub const ALL: [TrendMetric; 6] = [
        TrendMetric::Likes,
        TrendMetric::Comments,
        TrendMetric::Reposts,
        TrendMetric::Posts,
        TrendMetric::Views,
        TrendMetric::EngagementRate,
    ];

    /// Stable key used for output file names
    pub fn key(&self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Comments => "comments",
            Self::Reposts => "reposts",
            Self::Posts => "posts",
            Self::Views => "views",
            Self::EngagementRate => "er",
        }
    }

    /// Localized axis label
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Self::Likes => "Likes",
                Self::Comments => "Comments",
                Self::Reposts => "Reposts",
                Self::Posts => "Posts",
                Self::Views => "Views",
                Self::EngagementRate => "Engagement Rate (%)",
            },
            Locale::Ru => match self {
                Self::Likes => "Лайки",
                Self::Comments => "Комментарии",
                Self::Reposts => "Репосты",
                Self::Posts => "Посты",
                Self::Views => "Просмотры",
                Self::EngagementRate => "Engagement Rate (%)",
            },
        }
    }

    /// Line color for this metric
    pub fn color(&self) -> RGBColor {
        match self {
            Self::Likes => RGBColor(55, 120, 191),          // #3778bf
            Self::Comments => RGBColor(255, 166, 0),        // #ffa600
            Self::Reposts => RGBColor(67, 170, 139),        // #43aa8b
            Self::Posts => RGBColor(89, 13, 34),            // #590d22
            Self::Views => RGBColor(30, 136, 229),          // #1e88e5
            Self::EngagementRate => RGBColor(231, 76, 60),  // #e74c3c
        }
    }

    /// Extract this metric's value from a bucket
    pub fn value(&self, bucket: &PeriodBucket) -> f64 {
        match self {
            Self::Likes => bucket.likes as f64,
            Self::Comments => bucket.comments as f64,
            Self::Reposts => bucket.reposts as f64,
            Self::Posts => bucket.posts as f64,
            Self::Views => bucket.views as f64,
            Self::EngagementRate => bucket.er,
        }
    }
}

/// Line chart of one metric over aggregated periods
#[derive(Debug)]
pub struct MetricTrendGraph {
    pub metric: TrendMetric,
    pub data: Vec<PeriodBucket>,
    pub locale: Locale,
}

impl MetricTrendGraph {
    pub fn new(metric: TrendMetric, locale: Locale) -> Self {
        Self {
            metric,
            data: Vec::new(),
            locale,
        }
    }

    /// Set the aggregated buckets to plot
    pub fn set_data(&mut self, data: Vec<PeriodBucket>) {
        self.data = data;
    }

    /// Chart title, e.g. "Likes by Week"
    pub fn title(&self, period_label: &str) -> String {
        match self.locale {
            Locale::En => format!("{} by {}", self.metric.label(self.locale), period_label),
            Locale::Ru => format!("{} по {}", self.metric.label(self.locale), period_label),
        }
    }

    /// Max metric value for y-axis scaling, with 10% headroom
    fn y_max(&self) -> f64 {
        let max = self
            .data
            .iter()
            .map(|b| self.metric.value(b))
            .fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}

#[async_trait::async_trait]
impl GraphRenderer for MetricTrendGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.data.is_empty() {
            return Err(TgStatError::graph("No data available for trend chart"));
        }

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;

        let y_max = self.y_max();
        let x_max = self.data.len().saturating_sub(1).max(1);

        let title_font = (
            config.style.title_font.family.as_str(),
            config.style.title_font.size,
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(0usize..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .x_label_formatter(&|x| {
                self.data
                    .get(*x)
                    .map(|b| b.period.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        let color = self.metric.color();
        let points: Vec<(usize, f64)> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, b)| (i, self.metric.value(b)))
            .collect();

        chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, color.filled())),
        )?;

        root.present()?;
        tracing::info!("Rendered {} trend chart to {}", self.metric.key(), path.display());
        Ok(())
    }
}
