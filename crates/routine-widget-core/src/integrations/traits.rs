use std::future::Future;

use chrono::NaiveDate;

use crate::calendar::CalendarEvent;
use crate::error::Result;
use crate::routine::SessionSummary;

/// Where finished sessions are filed.
///
/// Implementations resolve "today" from `summary.timestamp` with
/// [`crate::DayBoundary`], never from their own clock.
pub trait RoutineStore {
    /// Unique identifier (e.g. "notion").
    fn name(&self) -> &str;

    /// Persist a finished session.
    fn save(&self, summary: &SessionSummary) -> impl Future<Output = Result<()>> + Send;
}

/// Source of calendar events for the month view.
pub trait EventSource {
    fn name(&self) -> &str;

    /// Events dated within `start..=end`, in source order.
    fn fetch_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<CalendarEvent>>> + Send;
}
