//! Dashboard footer

use tgstat_analytics::Locale;

/// Render the footer with a generation timestamp line
pub fn footer_html(generated_at: &str, locale: Locale) -> String {
    let label = match locale {
        Locale::En => "Generated",
        Locale::Ru => "Сформировано",
    };
    format!(
        r#"<div style="margin-top: 60px; padding: 40px 20px; border-top: 1px solid #e5e7eb; text-align: center;">
        <div style="font-size: 12px; color: #9ca3af;">{label}: {generated_at}</div>
    </div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_contains_timestamp() {
        let html = footer_html("2024-01-10 12:00:00", Locale::En);
        assert!(html.contains("Generated: 2024-01-10 12:00:00"));
    }

    #[test]
    fn test_footer_russian() {
        let html = footer_html("2024-01-10 12:00:00", Locale::Ru);
        assert!(html.contains("Сформировано"));
    }
}
