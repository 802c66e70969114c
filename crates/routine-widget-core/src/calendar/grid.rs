//! Month grid for the calendar widget.
//!
//! Weeks start on Sunday. Months are zero-based (`0` = January) to match the
//! widget's month cursor.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`, the key events are grouped under.
    pub date_string: String,
    pub is_current_month: bool,
    pub is_weekend: bool,
    pub is_today: bool,
}

impl CalendarDay {
    fn new(date: NaiveDate, month: u32, today: NaiveDate) -> Self {
        Self {
            date,
            date_string: date_key(date),
            is_current_month: date.month0() == month,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            is_today: date == today,
        }
    }
}

/// Grid for `year`/`month` (zero-based), with `is_today` set from the local clock.
pub fn generate(year: i32, month: u32) -> Vec<CalendarDay> {
    generate_with_today(year, month, Local::now().date_naive())
}

/// Grid for `year`/`month` (zero-based) against an explicit `today`.
///
/// Empty when the month is out of range.
pub fn generate_with_today(year: i32, month: u32, today: NaiveDate) -> Vec<CalendarDay> {
    let cursor = MonthCursor { year, month };
    let (Some(first), Some(last)) = (cursor.first_day(), cursor.last_day()) else {
        return Vec::new();
    };

    let leading = i64::from(first.weekday().num_days_from_sunday());
    let shown = leading + i64::from(last.day());
    let trailing = (DAYS_PER_WEEK as i64 - shown % DAYS_PER_WEEK as i64) % DAYS_PER_WEEK as i64;

    let start = first - Duration::days(leading);
    (0..shown + trailing)
        .map(|offset| CalendarDay::new(start + Duration::days(offset), month, today))
        .collect()
}

/// `YYYY-MM-DD` key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Weekday headers, Sunday first.
pub fn weekday_names(short: bool) -> [&'static str; DAYS_PER_WEEK] {
    if short {
        ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
    } else {
        [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ]
    }
}

/// The month a calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    /// Zero-based month, 0..=11.
    pub month: u32,
}

impl MonthCursor {
    /// `None` if `month` is not 0..=11.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// The month before. Stays put at the earliest representable month.
    pub fn prev(self) -> Self {
        if self.month == 0 {
            match self.year.checked_sub(1) {
                Some(year) => Self { year, month: 11 },
                None => self,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after. Stays put at the latest representable month.
    pub fn next(self) -> Self {
        if self.month >= 11 {
            match self.year.checked_add(1) {
                Some(year) => Self { year, month: 0 },
                None => self,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.first_day()?.checked_add_months(Months::new(1))?.pred_opt()
    }

    /// e.g. "February 2024".
    pub fn label(self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    pub fn days(self) -> Vec<CalendarDay> {
        generate(self.year, self.month)
    }
}
