//! Which calendar day a moment belongs to.
//!
//! A day starts at `cutoff_hour` local time instead of midnight, so a night
//! routine finished at 01:30 is filed under the evening it started. Every
//! lookup or write that needs "today" goes through [`DayBoundary`].

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};

/// Korea Standard Time, UTC+9.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;
pub const DEFAULT_CUTOFF_HOUR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    utc_offset: FixedOffset,
    cutoff_hour: u32,
}

impl DayBoundary {
    /// `cutoff_hour` is clamped to 0..=23.
    pub fn new(utc_offset: FixedOffset, cutoff_hour: u32) -> Self {
        Self {
            utc_offset,
            cutoff_hour: cutoff_hour.min(23),
        }
    }

    /// Build from minutes east of UTC. `None` if the offset is out of range.
    pub fn from_offset_minutes(minutes: i32, cutoff_hour: u32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self::new(offset, cutoff_hour))
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// The day `at` is attributed to.
    pub fn effective_date<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> NaiveDate {
        let local = at.with_timezone(&self.utc_offset).naive_local();
        attributed_date(local, self.cutoff_hour)
    }

    /// `[date, next date)` of the day `at` is attributed to.
    pub fn day_range<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> (NaiveDate, NaiveDate) {
        let date = self.effective_date(at);
        (date, date + Duration::days(1))
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix());
        Self::new(offset, DEFAULT_CUTOFF_HOUR)
    }
}

/// Local wall-clock time to its day: before `cutoff_hour` counts as the previous day.
pub fn attributed_date(local: NaiveDateTime, cutoff_hour: u32) -> NaiveDate {
    let date = local.date();
    if local.hour() < cutoff_hour {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kst(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn before_cutoff_belongs_to_previous_day() {
        let boundary = DayBoundary::default();
        assert_eq!(boundary.effective_date(&kst(2024, 3, 10, 3, 59)), date(2024, 3, 9));
        assert_eq!(boundary.effective_date(&kst(2024, 3, 10, 4, 0)), date(2024, 3, 10));
        assert_eq!(boundary.effective_date(&kst(2024, 3, 10, 23, 59)), date(2024, 3, 10));
    }

    #[test]
    fn utc_timestamps_are_shifted_to_local() {
        let boundary = DayBoundary::default();
        // 18:59 UTC == 03:59 KST next day.
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 59, 0).unwrap();
        assert_eq!(boundary.effective_date(&at), date(2024, 3, 9));
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 19, 0, 0).unwrap();
        assert_eq!(boundary.effective_date(&at), date(2024, 3, 10));
    }

    #[test]
    fn crosses_month_and_year() {
        let boundary = DayBoundary::default();
        assert_eq!(boundary.effective_date(&kst(2024, 1, 1, 0, 30)), date(2023, 12, 31));
        assert_eq!(boundary.effective_date(&kst(2024, 3, 1, 2, 0)), date(2024, 2, 29));
    }

    #[test]
    fn day_range_spans_one_day() {
        let boundary = DayBoundary::default();
        let (start, end) = boundary.day_range(&kst(2024, 2, 29, 1, 0));
        assert_eq!(start, date(2024, 2, 28));
        assert_eq!(end, date(2024, 2, 29));
    }

    #[test]
    fn offset_minutes_validation() {
        assert!(DayBoundary::from_offset_minutes(540, 4).is_some());
        assert!(DayBoundary::from_offset_minutes(-300, 4).is_some());
        assert!(DayBoundary::from_offset_minutes(60 * 25, 4).is_none());
        assert_eq!(DayBoundary::from_offset_minutes(0, 40).unwrap().cutoff_hour(), 23);
    }

    #[test]
    fn zero_cutoff_is_plain_midnight() {
        let local = date(2024, 5, 5).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(attributed_date(local, 0), date(2024, 5, 5));
    }
}
