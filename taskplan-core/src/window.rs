//! Date windows for listing events.

use chrono::{Duration, Local, NaiveDate, NaiveTime};

use crate::constants::DEFAULT_WINDOW_DAYS;

/// An inclusive range of calendar days, queried from `00:00:00` of the first
/// day to `23:59:59` of the last.
///
/// The range is not validated: an end before the start is passed through
/// and the provider simply returns nothing for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for RangeWindow {
    /// Today through today + DEFAULT_WINDOW_DAYS
    fn default() -> Self {
        Self::from_optional(None, None)
    }
}

impl RangeWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        RangeWindow {
            start_date,
            end_date,
        }
    }

    /// A window covering a single day.
    pub fn for_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Fill in missing bounds relative to the local date.
    pub fn from_optional(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::from_optional_at(Local::now().date_naive(), start, end)
    }

    /// `start` defaults to `today`, `end` to `start + DEFAULT_WINDOW_DAYS`.
    pub fn from_optional_at(
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let start_date = start.unwrap_or(today);
        let end_date = end.unwrap_or(start_date + Duration::days(DEFAULT_WINDOW_DAYS));
        Self::new(start_date, end_date)
    }

    /// Number of calendar days covered (0 when inverted).
    pub fn days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Lower query bound, e.g. `2024-03-01T00:00:00Z`.
    pub fn time_min(&self) -> String {
        format_bound(self.start_date, NaiveTime::MIN)
    }

    /// Upper query bound, e.g. `2024-03-31T23:59:59Z`.
    pub fn time_max(&self) -> String {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        format_bound(self.end_date, end_of_day)
    }

    /// `(time_min, time_max)` as passed to the provider's list call.
    pub fn bounds(&self) -> (String, String) {
        (self.time_min(), self.time_max())
    }
}

fn format_bound(date: NaiveDate, time: NaiveTime) -> String {
    format!("{}Z", date.and_time(time).format("%Y-%m-%dT%H:%M:%S"))
}
