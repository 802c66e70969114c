mod events;
mod grid;
mod view;

pub use events::{group_by_date, preview_events, CalendarEvent, EventsByDate};
pub use grid::{
    date_key, generate, generate_with_today, weekday_names, CalendarDay, MonthCursor, DAYS_PER_WEEK,
};
pub use view::{CalendarCell, CalendarView, FETCH_ERROR_MESSAGE};
