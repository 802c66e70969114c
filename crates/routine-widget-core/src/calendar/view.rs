use chrono::NaiveDate;

use super::events::{group_by_date, CalendarEvent, EventsByDate};
use super::grid::{generate_with_today, CalendarDay, MonthCursor};
use crate::error::Result;
use crate::integrations::EventSource;

/// Shown when events cannot be loaded.
pub const FETCH_ERROR_MESSAGE: &str = "일정을 불러올 수 없습니다.";

/// A grid day with its events.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell<'a> {
    pub day: CalendarDay,
    pub events: &'a [CalendarEvent],
}

impl CalendarCell<'_> {
    pub fn has_important(&self) -> bool {
        self.events.iter().any(|e| e.is_important)
    }
}

/// State of the calendar widget: which month, its events, and the last fetch error.
#[derive(Debug, Clone)]
pub struct CalendarView {
    cursor: MonthCursor,
    events: EventsByDate,
    error: Option<String>,
}

impl CalendarView {
    pub fn new(cursor: MonthCursor) -> Self {
        Self {
            cursor,
            events: EventsByDate::new(),
            error: None,
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn events(&self) -> &EventsByDate {
        &self.events
    }

    pub fn events_on(&self, date_key: &str) -> &[CalendarEvent] {
        self.events.get(date_key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Move one month back. Events belong to the old month and are dropped.
    pub fn prev(&mut self) {
        self.cursor = self.cursor.prev();
        self.events.clear();
        self.error = None;
    }

    pub fn next(&mut self) {
        self.cursor = self.cursor.next();
        self.events.clear();
        self.error = None;
    }

    /// Replace events with a fetch result. A failure leaves an empty month and an error message.
    pub fn apply_fetch<E: std::fmt::Display>(&mut self, result: std::result::Result<Vec<CalendarEvent>, E>) {
        match result {
            Ok(events) => {
                tracing::debug!(count = events.len(), month = %self.cursor.label(), "calendar events loaded");
                self.events = group_by_date(events);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, month = %self.cursor.label(), "calendar events unavailable");
                self.events.clear();
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Fetch the current month from `source` and apply the result.
    ///
    /// Returns whether the fetch succeeded. Failures are kept in [`CalendarView::error`].
    pub async fn refresh<S: EventSource>(&mut self, source: &S) -> bool {
        let (Some(start), Some(end)) = (self.cursor.first_day(), self.cursor.last_day()) else {
            self.apply_fetch::<String>(Err("month out of range".into()));
            return false;
        };
        let result: Result<Vec<CalendarEvent>> = source.fetch_events(start, end).await;
        let ok = result.is_ok();
        self.apply_fetch(result);
        ok
    }

    /// The month grid joined with each day's events.
    pub fn cells(&self, today: NaiveDate) -> Vec<CalendarCell<'_>> {
        generate_with_today(self.cursor.year, self.cursor.month, today)
            .into_iter()
            .map(|day| {
                let events = self.events_on(&day.date_string);
                CalendarCell { day, events }
            })
            .collect()
    }
}
