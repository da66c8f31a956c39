//! Weekday and period labels for the supported display locales

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Display locale for generated labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Parse a locale tag, defaulting to English for unknown tags
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ru" => Self::Ru,
            _ => Self::En,
        }
    }

    /// Full weekday name
    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        match self {
            Self::En => match weekday {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
            Self::Ru => match weekday {
                Weekday::Mon => "Понедельник",
                Weekday::Tue => "Вторник",
                Weekday::Wed => "Среда",
                Weekday::Thu => "Четверг",
                Weekday::Fri => "Пятница",
                Weekday::Sat => "Суббота",
                Weekday::Sun => "Воскресенье",
            },
        }
    }

    /// Label for an aggregation period
    pub fn period_name(&self, period: &str) -> &'static str {
        match self {
            Self::En => match period {
                "day" => "Day",
                "week" => "Week",
                "month" => "Month",
                "quarter" => "Quarter",
                _ => "Period",
            },
            Self::Ru => match period {
                "day" => "День",
                "week" => "Неделя",
                "month" => "Месяц",
                "quarter" => "Квартал",
                _ => "Период",
            },
        }
    }
}
