//! Pure week arithmetic over calendar dates.
//!
//! Weeks run Monday through Sunday throughout. Month-level counts use a
//! month-local convention: a month has as many weeks as its grid has
//! Monday-started rows, independent of ISO year numbering. This keeps
//! December/January sane even when the month's tail belongs to ISO week 1
//! of the following year.

use chrono::{Datelike, Duration, NaiveDate};

/// First day of the given month.
///
/// `month` must be in `1..=12`; callers hold that invariant by construction
/// (see [`CalendarCursor`](super::CalendarCursor)).
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month in 1..=12")
}

/// Last day of the given month.
fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month) - Duration::days(1)
}

/// ISO-8601 week number of a date.
///
/// Week 1 is the week containing the year's first Thursday; Dec 31 can land
/// in week 1 of the next ISO year and Jan 1 in the last week of the previous.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Number of Monday-started weeks overlapping the given month. Always >= 1.
pub fn weeks_in_month(year: i32, month: u32) -> u32 {
    let first = first_of_month(year, month);
    let last = last_of_month(year, month);

    // Days of the first grid row that precede the 1st, plus the month itself,
    // rounded up to whole weeks.
    let lead = i64::from(first.weekday().num_days_from_monday());
    let days = (last - first).num_days() + 1;
    ((lead + days + 6) / 7) as u32
}

/// 1-based index of the date's week within its own month.
///
/// Consistent with [`weeks_in_month`]: for every date,
/// `1 <= week_of_month(d) <= weeks_in_month(d.year, d.month)`.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date.year(), date.month());
    let lead = i64::from(first.weekday().num_days_from_monday());
    let day0 = i64::from(date.day()) - 1;
    ((lead + day0) / 7) as u32 + 1
}

/// The seven dates, Monday through Sunday, of the selected week of a month.
///
/// The row may extend before the 1st or past the last day of the month;
/// callers render those cells dimmed, never hidden.
pub fn week_dates(year: i32, month: u32, week: u32) -> [NaiveDate; 7] {
    let first = first_of_month(year, month);
    let monday = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));
    let start = monday + Duration::days(7 * (i64::from(week) - 1));
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Whether a grid cell's date belongs to the displayed month.
/// Rendering aid only; has no effect on bucketing or navigation.
pub fn is_in_current_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
