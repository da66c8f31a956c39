//! Summary stat tiles with optional period-over-period deltas

use super::format_delta;
use tgstat_analytics::{format_count, previous_period, Locale, MetricDelta, PeriodComparison, PeriodMetrics};
use tgstat_common::DateRange;

fn tile_label(metric: &str, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match metric {
            "posts" => "Posts",
            "views" => "Views",
            "likes" => "Likes",
            "comments" => "Comments",
            "reposts" => "Reposts",
            _ => "Avg ER",
        },
        Locale::Ru => match metric {
            "posts" => "Постов",
            "views" => "Просмотров",
            "likes" => "Лайков",
            "comments" => "Комментариев",
            "reposts" => "Репостов",
            _ => "Средний ER",
        },
    }
}

fn delta_badge(delta: Option<&MetricDelta>, is_light_bg: bool) -> String {
    delta
        .map(|d| format_delta(d.absolute, d.percent, is_light_bg))
        .unwrap_or_default()
}

/// Render the stats block: header plus a tile per tracked metric.
///
/// When `comparison` is present the tiles carry delta badges and the header
/// names the previous period.
pub fn stats_html(
    metrics: &PeriodMetrics,
    comparison: Option<&PeriodComparison>,
    range: &DateRange,
    locale: Locale,
) -> String {
    let deltas = comparison.map(|c| &c.deltas);

    let counters = [
        ("posts", metrics.posts, deltas.map(|d| &d.posts)),
        ("views", metrics.views, deltas.map(|d| &d.views)),
        ("likes", metrics.likes, deltas.map(|d| &d.likes)),
        ("comments", metrics.comments, deltas.map(|d| &d.comments)),
        ("reposts", metrics.reposts, deltas.map(|d| &d.reposts)),
    ];

    let mut tiles = Vec::new();
    for (key, value, delta) in counters {
        tiles.push(format!(
            r#"<div style='
            background: #fff;
            border: 1px solid #e5e7eb;
            border-radius: 12px;
            padding: 18px 10px 10px 10px;
            display: flex; flex-direction:column; align-items:center;'>
            <div style='font-size:12px; color:#6b7280; margin-bottom: 7px;'>{label}</div>
            <div style='font-size:26px; font-weight:700; color:#111827;'>{value}</div>
            {delta}
        </div>"#,
            label = tile_label(key, locale),
            value = format_count(value),
            delta = delta_badge(delta, false),
        ));
    }

    // The ER tile uses the accent gradient and light delta colors
    tiles.push(format!(
        r#"<div style='
            background: linear-gradient(135deg, #059669 25%, #047857 100%);
            border-radius: 12px; padding: 18px 10px 10px 10px; color: #fff; display:flex; flex-direction:column; align-items:center;'>
            <div style='font-size:12px; opacity: 0.85; margin-bottom: 7px;'>{label}</div>
            <div style='font-size:26px; font-weight:700;'>{value:.2}%</div>
            {delta}
        </div>"#,
        label = tile_label("avg_er", locale),
        value = metrics.avg_er,
        delta = delta_badge(deltas.map(|d| &d.avg_er), true),
    ));

    let (summary_label, comparison_label) = match locale {
        Locale::En => ("Summary for", "Compared with previous period:"),
        Locale::Ru => ("Саммари за период", "Сравнение с предыдущим периодом:"),
    };

    let header = if comparison.is_some() {
        let prev = previous_period(range);
        format!(
            r#"<h2 style="font-size:24px; font-weight:700; color:#111827; font-family:sans-serif; margin-bottom: 8px;">
            {summary_label} {start} — {end}
        </h2>
        <div style="font-size:14px; color:#6b7280; margin-bottom: 16px;">
            📊 {comparison_label} {prev_start} — {prev_end}
        </div>"#,
            start = range.start,
            end = range.end,
            prev_start = prev.start,
            prev_end = prev.end,
        )
    } else {
        format!(
            r#"<h2 style="font-size:24px; font-weight:700; color:#111827; font-family:sans-serif;">
            {summary_label} {start} — {end}
        </h2>"#,
            start = range.start,
            end = range.end,
        )
    };

    format!(
        r#"<div style="margin: 0 auto; max-width:1200px;">
        {header}
        <div style="display: grid; grid-template-columns: repeat(auto-fit,minmax(180px,1fr)); gap: 13px; margin-bottom: 35px;">
            {tiles}
        </div>
    </div>"#,
        tiles = tiles.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tgstat_analytics::compare_periods;
    use tgstat_common::Post;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
        )
    }

    fn post(views: u64, likes: u64) -> Post {
        Post {
            id: 1,
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            published_at: None,
            title: String::new(),
            views,
            likes,
            comments: 0,
            reposts: 0,
        }
    }

    #[test]
    fn test_stats_html_without_comparison() {
        let metrics = PeriodMetrics {
            posts: 3,
            views: 1500,
            likes: 42,
            comments: 7,
            reposts: 2,
            avg_er: 3.21,
        };
        let html = stats_html(&metrics, None, &range(), Locale::En);

        assert!(html.contains("Summary for 2024-01-10 — 2024-01-16"));
        assert!(html.contains("1.5K")); // formatted views
        assert!(html.contains("3.21%"));
        assert!(html.contains("Posts"));
        assert!(!html.contains("Compared with previous period"));
    }

    #[test]
    fn test_stats_html_with_comparison() {
        let current = vec![post(200, 20)];
        let previous = vec![post(100, 10)];
        let comparison = compare_periods(&current, &previous);

        let html = stats_html(&comparison.current, Some(&comparison), &range(), Locale::En);
        assert!(html.contains("Compared with previous period: 2024-01-03 — 2024-01-09"));
        assert!(html.contains("▲"));
        assert!(html.contains("+100.0%"));
    }

    #[test]
    fn test_stats_html_russian_labels() {
        let metrics = PeriodMetrics::default();
        let html = stats_html(&metrics, None, &range(), Locale::Ru);
        assert!(html.contains("Постов"));
        assert!(html.contains("Средний ER"));
        assert!(html.contains("Саммари за период"));
    }
}
