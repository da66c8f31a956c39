//! Immutable dashboard context threaded through rendering calls

use tgstat_analytics::Locale;
use tgstat_common::{DateRange, Post};

/// Everything the rendering layer needs for one dashboard build.
///
/// Built once after the fetch completes and passed explicitly; replaced
/// wholesale on the next fetch, never mutated in place.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    /// Channel link or username as given by the operator
    pub channel: String,
    /// Requested period
    pub range: DateRange,
    /// Whether a previous-period comparison was requested
    pub compare: bool,
    /// Display locale
    pub locale: Locale,
    /// Posts fetched for the requested period
    pub posts: Vec<Post>,
    /// Posts fetched for the preceding period, empty unless `compare`
    pub previous_posts: Vec<Post>,
}

impl DashboardContext {
    pub fn new(channel: impl Into<String>, range: DateRange, locale: Locale) -> Self {
        Self {
            channel: channel.into(),
            range,
            compare: false,
            locale,
            posts: Vec::new(),
            previous_posts: Vec::new(),
        }
    }

    /// Attach fetched posts for the requested period
    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    /// Attach posts for the preceding period and enable comparison
    pub fn with_previous_posts(mut self, posts: Vec<Post>) -> Self {
        self.previous_posts = posts;
        self.compare = true;
        self
    }

    /// Posts whose date falls inside the requested range.
    ///
    /// The fetch already filters by range; this guards rendering against a
    /// context assembled from a wider cache.
    pub fn posts_in_range(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| post.date.map(|d| self.range.contains(d)).unwrap_or(false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(day: NaiveDate) -> Post {
        Post {
            id: 0,
            date: Some(day),
            published_at: None,
            title: String::new(),
            views: 0,
            likes: 0,
            comments: 0,
            reposts: 0,
        }
    }

    #[test]
    fn test_posts_in_range_filters() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 16));
        let context = DashboardContext::new("@chan", range, Locale::En).with_posts(vec![
            post(date(2024, 1, 9)),
            post(date(2024, 1, 10)),
            post(date(2024, 1, 16)),
            post(date(2024, 1, 17)),
        ]);

        assert_eq!(context.posts_in_range().len(), 2);
    }

    #[test]
    fn test_with_previous_posts_enables_compare() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 16));
        let context = DashboardContext::new("@chan", range, Locale::En);
        assert!(!context.compare);

        let context = context.with_previous_posts(vec![post(date(2024, 1, 3))]);
        assert!(context.compare);
        assert_eq!(context.previous_posts.len(), 1);
    }
}
