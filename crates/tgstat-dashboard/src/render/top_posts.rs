//! Top-posts ranking block

use super::escape_html;
use tgstat_analytics::{format_count, Locale};
use tgstat_common::{utils::extract_channel_username, Post};

/// Posts below this view count are excluded from the ER ranking; tiny
/// samples produce absurd rates.
const ER_MIN_VIEWS: u64 = 50;

/// How many posts the block shows
const TOP_COUNT: usize = 5;

/// Ranking metric for the top-posts block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopPostsMode {
    #[default]
    Er,
    Views,
    Likes,
    Comments,
    Reposts,
}

impl TopPostsMode {
    /// Metric value used for sorting
    fn sort_value(&self, post: &Post) -> f64 {
        match self {
            Self::Er => post.engagement_rate(),
            Self::Views => post.views as f64,
            Self::Likes => post.likes as f64,
            Self::Comments => post.comments as f64,
            Self::Reposts => post.reposts as f64,
        }
    }

    /// Formatted metric value for display
    fn display_value(&self, post: &Post) -> String {
        match self {
            Self::Er => format!("{:.2}%", post.engagement_rate()),
            Self::Views => format_count(post.views),
            Self::Likes => format_count(post.likes),
            Self::Comments => format_count(post.comments),
            Self::Reposts => format_count(post.reposts),
        }
    }

    fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Self::Er => "ER",
                Self::Views => "Views",
                Self::Likes => "Likes",
                Self::Comments => "Comments",
                Self::Reposts => "Reposts",
            },
            Locale::Ru => match self {
                Self::Er => "ER",
                Self::Views => "Просмотры",
                Self::Likes => "Лайки",
                Self::Comments => "Комментарии",
                Self::Reposts => "Репосты",
            },
        }
    }
}

fn empty_message(locale: Locale) -> String {
    let text = match locale {
        Locale::En => "No posts to display",
        Locale::Ru => "Нет постов для отображения",
    };
    format!(
        "<div style='color:#6b7280; padding: 20px; text-align: center;'>{}</div>",
        text
    )
}

fn media_placeholder(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Post has no text. Probably media content",
        Locale::Ru => "Пост не содержит текст. Вероятно медиа-контент",
    }
}

/// Render the top posts by the selected metric.
///
/// The ER mode only considers posts with more than 50 views.
pub fn top_posts_html(posts: &[Post], channel: &str, mode: TopPostsMode, locale: Locale) -> String {
    if posts.is_empty() {
        return empty_message(locale);
    }

    let mut filtered: Vec<&Post> = match mode {
        TopPostsMode::Er => posts.iter().filter(|p| p.views > ER_MIN_VIEWS).collect(),
        _ => posts.iter().collect(),
    };
    if filtered.is_empty() {
        return empty_message(locale);
    }

    filtered.sort_by(|a, b| {
        mode.sort_value(b)
            .partial_cmp(&mode.sort_value(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    filtered.truncate(TOP_COUNT);

    let channel_username = extract_channel_username(channel);

    let mut rows = String::from(
        r#"<div style="display:flex; flex-direction:column; gap:12px; width:100%;">"#,
    );

    for (i, post) in filtered.iter().enumerate() {
        let text_preview = if post.title.is_empty() || post.title == "(no text)" || post.title == "(без текста)" {
            media_placeholder(locale).to_string()
        } else if post.title.chars().count() > 35 {
            let cut: String = post.title.chars().take(35).collect();
            format!("{}…", escape_html(&cut))
        } else {
            escape_html(&post.title)
        };

        let link = if channel_username.is_empty() {
            "#".to_string()
        } else {
            format!("https://t.me/{}/{}", channel_username, post.id)
        };

        rows.push_str(&format!(
            r#"
        <div style="
            display:grid;
            grid-template-columns: 40px minmax(100px, 1fr) 200px 140px 40px;
            gap:16px;
            align-items:center;
            background:#ffffff;
            border:1px solid #e5e7eb;
            border-radius:12px;
            padding:14px 18px;
        ">
            <div style="font-size:20px; font-weight:700; color:#059669;">{rank}</div>
            <div style="font-size:14px; font-weight:500; color:#111827; white-space:nowrap; overflow:hidden; text-overflow:ellipsis;">{preview}</div>
            <div style="display:flex; gap:18px; font-size:13px; color:#374151;">
                <div><b>{views}</b> 👁</div>
                <div><b>{likes}</b> 👍</div>
                <div><b>{comments}</b> 💬</div>
                <div><b>{reposts}</b> 🔁</div>
            </div>
            <div style="display:flex; font-size:16px; font-weight:700; color:#059669; text-align:center;">{metric_label}: {metric_value}</div>
            <a href="{link}" target="_blank" style="display:flex; text-decoration:none; font-size:18px;">🔗</a>
        </div>"#,
            rank = i + 1,
            preview = text_preview,
            views = post.views,
            likes = post.likes,
            comments = post.comments,
            reposts = post.reposts,
            metric_label = mode.label(locale),
            metric_value = mode.display_value(post),
            link = link,
        ));
    }

    rows.push_str("</div>");
    rows
}
