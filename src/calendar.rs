//! Working-day arithmetic over a configured holiday calendar.
//!
//! A day counts as a working day unless it falls on Saturday/Sunday or is in
//! the holiday set. The holiday list is configuration data (see
//! `Config::from_env`); the default set covers the public holidays for 2025.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;

/// Public holidays observed by default when no override is configured.
static DEFAULT_HOLIDAYS_2025: Lazy<Vec<NaiveDate>> = Lazy::new(|| {
    [
        (2025, 2, 21),  // Shaheed Day
        (2025, 3, 26),  // Independence Day
        (2025, 4, 14),  // Bengali New Year
        (2025, 5, 1),   // May Day
        (2025, 12, 16), // Victory Day
        (2025, 12, 25), // Christmas Day
    ]
    .iter()
    .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    .collect()
});

/// Calendar used to compute how many working days a leave interval spans.
#[derive(Debug, Clone)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
}

impl WorkCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Calendar with the built-in 2025 holiday set.
    pub fn with_default_holidays() -> Self {
        Self::new(DEFAULT_HOLIDAYS_2025.iter().copied())
    }

    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.holidays.contains(&day)
    }

    pub fn is_working_day(&self, day: NaiveDate) -> bool {
        !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(day)
    }

    /// Count of working days in `[start, end]` inclusive.
    ///
    /// Returns 0 when `end < start` or when every day in the range is a
    /// weekend day or holiday.
    pub fn working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let mut day = start;
        let mut count = 0;
        while day <= end {
            if self.is_working_day(day) {
                count += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        count
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::with_default_holidays()
    }
}
