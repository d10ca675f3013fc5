//! The (year, month, week) navigation cursor.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::week_math::{week_dates, week_of_month, weeks_in_month};

/// The currently displayed week of the roster calendar.
///
/// `month` is always in `1..=12`; every transition is total, so no invalid
/// state is reachable through this API. `week` is normally within
/// `1..=weeks_in_month(year, month)` — [`set_week`](Self::set_week) is the
/// one deliberate exception, matching the selection-control contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarCursor {
    year: i32,
    month: u32,
    week: u32,
}

impl CalendarCursor {
    /// Cursor showing the week containing `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            week: week_of_month(today),
        }
    }

    /// Cursor showing the current real-world week (local clock).
    pub fn now() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Move one week back, rolling into the previous month (and year) from
    /// week 1. Landing in a new month selects its last week.
    pub fn previous_week(&mut self) {
        if self.week > 1 {
            self.week -= 1;
            return;
        }
        if self.month == 1 {
            self.year -= 1;
            self.month = 12;
        } else {
            self.month -= 1;
        }
        self.week = weeks_in_month(self.year, self.month);
    }

    /// Move one week forward, rolling into the next month (and year) from
    /// the last week. Landing in a new month selects its first week.
    pub fn next_week(&mut self) {
        if self.week < weeks_in_month(self.year, self.month) {
            self.week += 1;
            return;
        }
        if self.month == 12 {
            self.year += 1;
            self.month = 1;
        } else {
            self.month += 1;
        }
        self.week = 1;
    }

    /// Jump to the week containing `today`.
    pub fn jump_to_today(&mut self, today: NaiveDate) {
        *self = Self::for_date(today);
    }

    /// Select a month directly. The week resets to 1: the set of valid
    /// weeks differs per month, so no previous selection survives.
    pub fn set_month(&mut self, month: u32) {
        debug_assert!((1..=12).contains(&month));
        self.month = month;
        self.week = 1;
    }

    /// Select a year directly. The week resets to 1, as for `set_month`.
    pub fn set_year(&mut self, year: i32) {
        self.year = year;
        self.week = 1;
    }

    /// Select a week directly. Accepted as-is, no clamping: selection
    /// controls are expected to offer only [`week_options`](Self::week_options).
    pub fn set_week(&mut self, week: u32) {
        self.week = week;
    }

    /// The seven dates, Monday through Sunday, of the displayed week.
    pub fn week_dates(&self) -> [NaiveDate; 7] {
        week_dates(self.year, self.month, self.week)
    }

    /// Valid week selections for the displayed month.
    pub fn week_options(&self) -> Vec<u32> {
        (1..=weeks_in_month(self.year, self.month)).collect()
    }

    /// Month selections for controls.
    pub fn month_options() -> [u32; 12] {
        [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
    }

    /// Year selections for controls: a window around the displayed year.
    pub fn year_options(&self, span: i32) -> Vec<i32> {
        (self.year - span..=self.year + span).collect()
    }
}
