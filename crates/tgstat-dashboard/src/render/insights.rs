//! Posting-time insights block

use tgstat_analytics::{Locale, PostingAnalysis, SlotRecommendation};

const CSS_STYLES: &str = r#"
    <style>
        .insights-container { max-width: 1200px; margin: 0 auto; }
        .insights-section { margin-bottom: 40px; }
        .insights-title { font-size: 18px; font-weight: 700; color: #111827; margin-bottom: 20px; }
        .insights-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 16px; }
        .insight-card { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; display: flex; flex-direction: column; }
        .insight-metric-label { font-size: 12px; font-weight: 500; color: #6b7280; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 12px; }
        .insight-main-value { font-size: 18px; font-weight: 700; color: #111827; margin-bottom: 8px; line-height: 1.4; }
        .insight-diff { font-size: 14px; font-weight: 600; color: #059669; margin-bottom: 12px; }
        .insight-meta { font-size: 12px; color: #6b7280; margin-top: auto; padding-top: 12px; border-top: 1px solid #f3f4f6; }
        .insights-negative { margin-top: 40px; }
        .insight-conflict { background: #fffbeb; border: 1px solid #fcd34d; border-radius: 12px; padding: 16px 20px; margin-bottom: 24px; font-size: 14px; color: #92400e; }
        .insufficient-data { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; text-align: center; }
        .insufficient-title { font-size: 16px; font-weight: 600; color: #111827; margin-bottom: 8px; }
        .insufficient-text { font-size: 14px; color: #6b7280; margin-bottom: 8px; }
        .insufficient-meta { font-size: 12px; color: #9ca3af; }
    </style>
"#;

struct Strings {
    no_data: &'static str,
    insufficient_title: &'static str,
    insufficient_text: &'static str,
    posts_label: &'static str,
    period_label: &'static str,
    days_label: &'static str,
    best_title: &'static str,
    worst_title: &'static str,
    for_views: &'static str,
    for_er: &'static str,
    min_reach: &'static str,
    min_er: &'static str,
    below_average: &'static str,
    average_views: &'static str,
    average_er: &'static str,
    conflict_notice: &'static str,
    reach_word: &'static str,
    er_word: &'static str,
}

fn strings(locale: Locale) -> Strings {
    match locale {
        Locale::En => Strings {
            no_data: "No data to analyze",
            insufficient_title: "Not enough data",
            insufficient_text: "Not enough data for reliable recommendations. A period of 15 days or more is recommended.",
            posts_label: "Posts",
            period_label: "Period",
            days_label: "days",
            best_title: "Best posting times",
            worst_title: "When not to publish",
            for_views: "For views",
            for_er: "For ER (engagement)",
            min_reach: "Minimum reach",
            min_er: "Minimum ER",
            below_average: "Below average",
            average_views: "Average",
            average_er: "Average ER",
            conflict_notice: "Reach and engagement peak at different times:",
            reach_word: "views",
            er_word: "engagement",
        },
        Locale::Ru => Strings {
            no_data: "Нет данных для анализа",
            insufficient_title: "Недостаточно данных",
            insufficient_text: "Недостаточно данных для точных рекомендаций. Рекомендуется период от 15 дней.",
            posts_label: "Постов",
            period_label: "Период",
            days_label: "дней",
            best_title: "Лучшее время публикаций",
            worst_title: "Когда лучше не публиковать контент",
            for_views: "Для просмотров",
            for_er: "Для ER (вовлечённости)",
            min_reach: "Минимальный охват",
            min_er: "Минимальная ER",
            below_average: "Ниже среднего",
            average_views: "Среднее",
            average_er: "Средний ER",
            conflict_notice: "Охват и вовлечённость достигают пика в разное время:",
            reach_word: "просмотры",
            er_word: "вовлечённость",
        },
    }
}

/// "x% more views" / "x% less engagement" line under a recommendation
fn format_percent_diff(percent_diff: f64, is_views: bool, locale: Locale) -> String {
    match locale {
        Locale::En => {
            let direction = if percent_diff > 0.0 { "more" } else { "fewer" };
            if is_views {
                format!("{:.1}% {} views", percent_diff.abs(), direction)
            } else {
                let direction = if percent_diff > 0.0 { "higher" } else { "lower" };
                format!("{:.1}% {} engagement", percent_diff.abs(), direction)
            }
        }
        Locale::Ru => {
            if is_views {
                let direction = if percent_diff > 0.0 { "больше" } else { "меньше" };
                format!("на {:.1}% {} просмотров", percent_diff.abs(), direction)
            } else {
                let direction = if percent_diff > 0.0 { "выше" } else { "ниже" };
                format!("на {:.1}% {} вовлечённости", percent_diff.abs(), direction)
            }
        }
    }
}

fn best_card(rec: &SlotRecommendation, is_views: bool, s: &Strings, locale: Locale) -> String {
    let diff_text = format_percent_diff(rec.percent_diff, is_views, locale);
    let (label, meta) = if is_views {
        (
            s.for_views,
            format!(
                "{}: {:.0} · {}: {}",
                s.average_views, rec.value, s.posts_label, rec.posts_count
            ),
        )
    } else {
        (
            s.for_er,
            format!(
                "{}: {:.2}% · {}: {}",
                s.average_er, rec.value, s.posts_label, rec.posts_count
            ),
        )
    };

    format!(
        r#"<div class="insight-card">
            <div class="insight-metric-label">{label}</div>
            <div class="insight-main-value">{day}, {time_range}</div>
            <div class="insight-diff">{diff_text}</div>
            <div class="insight-meta">{meta}</div>
        </div>"#,
        day = rec.slot.day,
        time_range = rec.slot.time_range,
    )
}

fn worst_card(rec: &SlotRecommendation, is_views: bool, s: &Strings) -> String {
    let (label, meta) = if is_views {
        (
            s.min_reach,
            format!(
                "{}: {:.0} · {}: {}",
                s.average_views, rec.value, s.posts_label, rec.posts_count
            ),
        )
    } else {
        (
            s.min_er,
            format!(
                "{}: {:.2}% · {}: {}",
                s.average_er, rec.value, s.posts_label, rec.posts_count
            ),
        )
    };

    format!(
        r#"<div class="insight-card">
            <div class="insight-metric-label">{label}</div>
            <div class="insight-main-value">{day}, {time_range}</div>
            <div class="insight-diff" style="color: #6b7280;">{below}</div>
            <div class="insight-meta">{meta}</div>
        </div>"#,
        day = rec.slot.day,
        time_range = rec.slot.time_range,
        below = s.below_average,
    )
}

/// Render the posting-time insights block for any analysis outcome
pub fn posting_insights_html(analysis: &PostingAnalysis, locale: Locale) -> String {
    let s = strings(locale);

    match analysis {
        PostingAnalysis::NoData => format!(
            r#"{CSS_STYLES}
            <div class="insights-container">
                <div class="insufficient-data">
                    <div class="insufficient-text">{}</div>
                </div>
            </div>"#,
            s.no_data
        ),
        PostingAnalysis::InsufficientData {
            posts_count,
            days_range,
        } => format!(
            r#"{CSS_STYLES}
            <div class="insights-container">
                <div class="insufficient-data">
                    <div class="insufficient-title">{title}</div>
                    <div class="insufficient-text">{text}</div>
                    <div class="insufficient-meta">{posts_label}: {posts_count} | {period_label}: {days_range} {days_label}</div>
                </div>
            </div>"#,
            title = s.insufficient_title,
            text = s.insufficient_text,
            posts_label = s.posts_label,
            period_label = s.period_label,
            days_label = s.days_label,
        ),
        PostingAnalysis::Ready(report) => {
            let mut sections = Vec::new();

            if report.has_conflict {
                if let Some(conflict) = &report.conflict {
                    sections.push(format!(
                        r#"<div class="insight-conflict">⚖️ {notice} {reach_word} — {views_day}, {views_range}; {er_word} — {er_day}, {er_range}.</div>"#,
                        notice = s.conflict_notice,
                        reach_word = s.reach_word,
                        views_day = conflict.views.day,
                        views_range = conflict.views.time_range,
                        er_word = s.er_word,
                        er_day = conflict.er.day,
                        er_range = conflict.er.time_range,
                    ));
                }
            }

            let mut best_cards = Vec::new();
            if let Some(rec) = report.best_views.first() {
                best_cards.push(best_card(rec, true, &s, locale));
            }
            if let Some(rec) = report.best_er.first() {
                best_cards.push(best_card(rec, false, &s, locale));
            }
            if !best_cards.is_empty() {
                sections.push(format!(
                    r#"<section class="insights-section">
                    <div class="insights-title">{title}</div>
                    <div class="insights-grid">{cards}</div>
                </section>"#,
                    title = s.best_title,
                    cards = best_cards.join("\n"),
                ));
            }

            let mut negative_cards = Vec::new();
            if let Some(rec) = report.worst_views.first() {
                negative_cards.push(worst_card(rec, true, &s));
            }
            if let Some(rec) = report.worst_er.first() {
                negative_cards.push(worst_card(rec, false, &s));
            }
            if !negative_cards.is_empty() {
                sections.push(format!(
                    r#"<section class="insights-section insights-negative">
                    <div class="insights-title">{title}</div>
                    <div class="insights-grid">{cards}</div>
                </section>"#,
                    title = s.worst_title,
                    cards = negative_cards.join("\n"),
                ));
            }

            format!(
                r#"{CSS_STYLES}
            <div class="insights-container">{}</div>"#,
                sections.join("\n")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tgstat_analytics::analyze_posting_times;
    use tgstat_common::Post;

    fn post_on(days: i64, hour: u32, views: u64, likes: u64) -> Post {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(days);
        let published_at = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
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

    #[test]
    fn test_no_data_message() {
        let html = posting_insights_html(&PostingAnalysis::NoData, Locale::En);
        assert!(html.contains("No data to analyze"));
    }

    #[test]
    fn test_insufficient_data_shows_counts() {
        let analysis = PostingAnalysis::InsufficientData {
            posts_count: 3,
            days_range: 4,
        };
        let html = posting_insights_html(&analysis, Locale::En);
        assert!(html.contains("Not enough data"));
        assert!(html.contains("Posts: 3"));
        assert!(html.contains("Period: 4 days"));
    }

    #[test]
    fn test_insufficient_data_russian() {
        let analysis = PostingAnalysis::InsufficientData {
            posts_count: 5,
            days_range: 10,
        };
        let html = posting_insights_html(&analysis, Locale::Ru);
        assert!(html.contains("Недостаточно данных"));
        assert!(html.contains("Постов: 5"));
    }

    #[test]
    fn test_full_report_sections() {
        let mut posts = Vec::new();
        for week in 0..5 {
            posts.push(post_on(week * 7, 9, 1000, 1));
            posts.push(post_on(week * 7 + 1, 18, 100, 50));
        }
        let analysis = analyze_posting_times(&posts, Locale::En);
        let html = posting_insights_html(&analysis, Locale::En);

        assert!(html.contains("Best posting times"));
        assert!(html.contains("When not to publish"));
        assert!(html.contains("For views"));
        assert!(html.contains("For ER (engagement)"));
        assert!(html.contains("Monday"));
        assert!(html.contains("Tuesday"));
        // This dataset conflicts: reach peaks Monday, engagement Tuesday
        assert!(html.contains("different times"));
    }

    #[test]
    fn test_no_conflict_banner_when_aligned() {
        let mut posts = Vec::new();
        for week in 0..5 {
            posts.push(post_on(week * 7, 9, 1000, 500));
            posts.push(post_on(week * 7 + 1, 18, 100, 1));
        }
        let analysis = analyze_posting_times(&posts, Locale::En);
        let html = posting_insights_html(&analysis, Locale::En);
        assert!(!html.contains("different times"));
    }

    #[test]
    fn test_percent_diff_formatting() {
        assert_eq!(
            format_percent_diff(25.0, true, Locale::En),
            "25.0% more views"
        );
        assert_eq!(
            format_percent_diff(-10.0, true, Locale::En),
            "10.0% fewer views"
        );
        assert_eq!(
            format_percent_diff(5.5, false, Locale::En),
            "5.5% higher engagement"
        );
        assert_eq!(
            format_percent_diff(25.0, true, Locale::Ru),
            "на 25.0% больше просмотров"
        );
        assert_eq!(
            format_percent_diff(-5.5, false, Locale::Ru),
            "на 5.5% ниже вовлечённости"
        );
    }
}
