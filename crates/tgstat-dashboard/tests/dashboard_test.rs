//! End-to-end rendering test: posts in, complete dashboard page out

use chrono::{Duration, NaiveDate};
use tgstat_analytics::{analyze_posting_times, calculate_metrics, compare_periods, Locale};
use tgstat_common::{DateRange, Post};
use tgstat_dashboard::{render, DashboardContext};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn post_on(id: i64, days: i64, hour: u32, views: u64, likes: u64) -> Post {
    let day = date(2024, 3, 4) + Duration::days(days);
    let published_at = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
    Post {
        id,
        date: Some(day),
        published_at: Some(published_at),
        title: format!("Channel update number {}", id),
        views,
        likes,
        comments: 2,
        reposts: 1,
    }
}

#[test]
fn full_dashboard_page_renders_every_section() {
    // Four weeks of history: Monday mornings reach, Saturday evenings engage
    let mut posts = Vec::new();
    let mut id = 1;
    for week in 0..4 {
        posts.push(post_on(id, week * 7, 9, 4000, 20));
        id += 1;
        posts.push(post_on(id, week * 7 + 5, 19, 600, 90));
        id += 1;
    }

    let range = DateRange::new(date(2024, 3, 4), date(2024, 3, 31));
    let context = DashboardContext::new("https://t.me/mychannel", range, Locale::En)
        .with_posts(posts.clone());

    let posts_in_range: Vec<Post> = context.posts_in_range().into_iter().cloned().collect();
    let metrics = calculate_metrics(&posts_in_range);
    let analysis = analyze_posting_times(&posts_in_range, Locale::En);

    let charts = vec![("Views by Week".to_string(), "views_trend.png".to_string())];
    let page = render::dashboard_page(&context, &metrics, None, &analysis, &charts, "2024-04-01 00:00:00 UTC");

    // Page skeleton
    assert!(page.contains("<!DOCTYPE html>"));
    assert!(page.contains("Channel statistics"));
    assert!(page.contains("https://t.me/mychannel"));

    // Stats tiles
    assert!(page.contains("Summary for 2024-03-04 — 2024-03-31"));
    assert!(page.contains("Views"));

    // Top posts link into the channel
    assert!(page.contains("https://t.me/mychannel/"));

    // Chart image
    assert!(page.contains("views_trend.png"));

    // Insights with the reach/engagement conflict from this dataset
    assert!(page.contains("Best posting times"));
    assert!(page.contains("Monday"));
    assert!(page.contains("Saturday"));

    // Footer
    assert!(page.contains("Generated: 2024-04-01 00:00:00 UTC"));
}

#[test]
fn comparison_page_carries_delta_badges() {
    let current: Vec<Post> = (0..4i64).map(|i| post_on(i, i, 12, 2000, 40)).collect();
    let previous: Vec<Post> = (0..4i64).map(|i| post_on(i, i, 12, 1000, 20)).collect();

    let range = DateRange::new(date(2024, 3, 4), date(2024, 3, 10));
    let context = DashboardContext::new("@mychannel", range, Locale::En)
        .with_posts(current.clone())
        .with_previous_posts(previous.clone());

    let posts_in_range: Vec<Post> = context.posts_in_range().into_iter().cloned().collect();
    let comparison = compare_periods(&posts_in_range, &context.previous_posts);
    let analysis = analyze_posting_times(&posts_in_range, Locale::En);

    let page = render::dashboard_page(
        &context,
        &comparison.current,
        Some(&comparison),
        &analysis,
        &[],
        "2024-04-01 00:00:00 UTC",
    );

    assert!(page.contains("Compared with previous period"));
    assert!(page.contains("▲"));
    assert!(page.contains("+100.0%"));
}
