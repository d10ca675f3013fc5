//! Roster calendar engine.
//!
//! The one piece of real logic in the system: ISO-week arithmetic,
//! week-of-month navigation with month/year rollover, and bucketing of
//! on-call assignments onto the days of the displayed week.
//!
//! - [`week_math`]: pure date computations, no side effects
//! - [`cursor`]: the (year, month, week) navigation state machine
//! - [`roster`]: the engine tying the cursor to a cached month of
//!   assignments loaded through the [`RosterStore`] seam

pub mod cursor;
pub mod roster;
pub mod week_math;

pub use cursor::CalendarCursor;
pub use roster::{bucket_by_start_date, DayBucket, RosterCalendar, RosterError, RosterStore};
pub use week_math::{
    is_in_current_month, iso_week_number, week_dates, week_of_month, weeks_in_month,
};
