//! HTML fragment rendering for the dashboard

pub mod footer;
pub mod insights;
pub mod stats;
pub mod top_posts;

pub use footer::footer_html;
pub use insights::posting_insights_html;
pub use stats::stats_html;
pub use top_posts::{top_posts_html, TopPostsMode};

/// Delta badge under a stat tile: arrow, color and percent text.
///
/// `is_light_bg` switches to light colors for tiles with a dark background.
pub fn format_delta(delta_abs: f64, delta_percent: Option<f64>, is_light_bg: bool) -> String {
    let (icon, color) = if delta_abs > 0.0 {
        ("▲", if is_light_bg { "#fff" } else { "#059669" })
    } else if delta_abs < 0.0 {
        ("▼", if is_light_bg { "#ffcccc" } else { "#dc2626" })
    } else {
        ("—", if is_light_bg { "#e5e7eb" } else { "#6b7280" })
    };

    let percent_str = match delta_percent {
        Some(percent) => format!("{:+.1}%", percent),
        None => "—".to_string(),
    };

    format!(
        r#"<div style="display: flex; align-items: center; justify-content: center; gap: 4px; margin-top: 4px;">
        <span style="color: {color}; font-size: 14px;">{icon}</span>
        <span style="color: {color}; font-size: 13px; font-weight: 600;">{percent_str}</span>
    </div>"#
    )
}

/// Escape text destined for an HTML fragment
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Assemble the complete dashboard page.
///
/// `chart_files` pairs a chart title with its image path relative to the
/// output directory.
pub fn dashboard_page(
    context: &crate::DashboardContext,
    metrics: &tgstat_analytics::PeriodMetrics,
    comparison: Option<&tgstat_analytics::PeriodComparison>,
    analysis: &tgstat_analytics::PostingAnalysis,
    chart_files: &[(String, String)],
    generated_at: &str,
) -> String {
    use tgstat_analytics::Locale;

    let locale = context.locale;
    let (page_title, top_posts_title, graphs_title, insights_title) = match locale {
        Locale::En => (
            "Channel statistics",
            "Top posts",
            "Graphs and analytics",
            "Posting insights",
        ),
        Locale::Ru => (
            "Статистика канала",
            "Топ постов",
            "Графики и аналитика",
            "Ценные инсайты за бесплатно",
        ),
    };

    let posts_in_range: Vec<_> = context.posts_in_range().into_iter().cloned().collect();

    let stats_block = stats::stats_html(metrics, comparison, &context.range, locale);
    let top_posts_block = top_posts::top_posts_html(
        &posts_in_range,
        &context.channel,
        TopPostsMode::default(),
        locale,
    );
    let insights_block = insights::posting_insights_html(analysis, locale);
    let footer_block = footer::footer_html(generated_at, locale);

    let charts_block: String = chart_files
        .iter()
        .map(|(title, path)| {
            format!(
                r#"<figure style="margin: 0 0 24px 0;">
                <img src="{path}" alt="{title}" style="max-width: 100%; border: 1px solid #e5e7eb; border-radius: 8px;">
            </figure>"#,
                path = escape_html(path),
                title = escape_html(title),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{page_title} — {channel}</title>
</head>
<body style="font-family: sans-serif; background: #f9fafb; margin: 0; padding: 32px;">
<main style="max-width: 1200px; margin: 0 auto;">
{stats_block}
<section style="margin-bottom: 35px;">
<h3 style="font-size: 20px; font-weight: 600; color: #111827;">{top_posts_title}</h3>
{top_posts_block}
</section>
<section style="margin-bottom: 35px;">
<h3 style="font-size: 20px; font-weight: 600; color: #111827;">{graphs_title}</h3>
{charts_block}
</section>
<section>
<h3 style="font-size: 20px; font-weight: 600; color: #111827;">{insights_title}</h3>
{insights_block}
</section>
{footer_block}
</main>
</body>
</html>"#,
        lang = match locale {
            Locale::En => "en",
            Locale::Ru => "ru",
        },
        channel = escape_html(&context.channel),
    )
}
