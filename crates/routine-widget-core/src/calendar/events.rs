use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::grid::date_key;

/// An event shown on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub page_url: String,
}

/// Events keyed by `YYYY-MM-DD`, each day's list in fetch order.
pub type EventsByDate = BTreeMap<String, Vec<CalendarEvent>>;

pub fn group_by_date(events: impl IntoIterator<Item = CalendarEvent>) -> EventsByDate {
    let mut grouped = EventsByDate::new();
    for event in events {
        grouped.entry(event.date.clone()).or_default().push(event);
    }
    grouped
}

/// Sample events for the widget's preview mode, placed in `today`'s month.
pub fn preview_events(today: NaiveDate) -> Vec<CalendarEvent> {
    let day = |d: u32| {
        NaiveDate::from_ymd_opt(today.year(), today.month(), d)
            .map(date_key)
            .unwrap_or_else(|| date_key(today))
    };
    let sample = |n: u32, date: String, title: &str, is_important: bool| CalendarEvent {
        id: format!("sample-{n}"),
        date,
        title: title.to_string(),
        is_important,
        page_url: "#".to_string(),
    };

    vec![
        sample(1, date_key(today), "팀 미팅", true),
        sample(2, date_key(today), "프로젝트 발표", true),
        sample(3, day(2), "중요 회의", true),
        sample(4, day(2), "고객 미팅", true),
        sample(5, day(15), "마감일", true),
        sample(6, day(23), "발표 준비", true),
        sample(7, day(5), "보고서 제출", false),
        sample(8, day(10), "회식", false),
        sample(9, day(18), "스터디", false),
    ]
}
