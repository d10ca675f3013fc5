//! Roster calendar engine: cursor + cached month of assignments.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::cursor::CalendarCursor;
use super::week_math::is_in_current_month;
use crate::models::{Assignment, AssignmentDraft, NewAssignment, ValidationError};
use crate::store::DbError;

/// Errors surfaced by roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Assignment not found: {0}")]
    NotFound(i64),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// The roster collaborator: month-filtered listing plus mutations.
///
/// Implemented by [`store::Database`](crate::store::Database); an async
/// remote store would slot in behind the same seam.
pub trait RosterStore {
    /// All assignments whose start date falls within the given month.
    fn list_assignments(&self, year: i32, month: u32) -> Result<Vec<Assignment>, DbError>;

    /// Persist a new assignment, returning the stored row.
    fn create_assignment(&self, new: &NewAssignment) -> Result<Assignment, DbError>;

    /// Replace an assignment's fields, returning the stored row.
    fn update_assignment(&self, id: i64, new: &NewAssignment) -> Result<Assignment, DbError>;

    /// Delete an assignment by id.
    fn delete_assignment(&self, id: i64) -> Result<(), DbError>;
}

/// One grid cell of the displayed week.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket<'a> {
    /// The cell's calendar date
    pub date: NaiveDate,
    /// Whether the date belongs to the displayed month (dimming aid)
    pub in_month: bool,
    /// Assignments starting on this date, in load order
    pub assignments: Vec<&'a Assignment>,
}

/// Bucket assignments onto the seven dates of a week by their start date.
///
/// The comparison is calendar-date equality in local time, not instant
/// equality or range overlap: a shift spanning midnight lands only under
/// its start date, never duplicated onto the end date.
pub fn bucket_by_start_date<'a>(
    dates: &[NaiveDate; 7],
    assignments: &'a [Assignment],
) -> [Vec<&'a Assignment>; 7] {
    std::array::from_fn(|i| {
        assignments
            .iter()
            .filter(|a| a.starts_at.date() == dates[i])
            .collect()
    })
}

/// Roster calendar: the navigation cursor plus a read-through cache of the
/// displayed month's assignments.
///
/// Navigation that lands on a different (year, month) reloads the cache
/// from the store before returning, so the cache and cursor never refer to
/// different months. Mutations are pessimistic: the cache changes only
/// after the store has accepted the operation.
#[derive(Debug)]
pub struct RosterCalendar {
    cursor: CalendarCursor,
    assignments: Vec<Assignment>,
}

impl RosterCalendar {
    /// Engine positioned on the week containing `today`, cache loaded.
    pub fn open<S: RosterStore>(store: &S, today: NaiveDate) -> RosterResult<Self> {
        let mut roster = Self {
            cursor: CalendarCursor::for_date(today),
            assignments: Vec::new(),
        };
        roster.refresh(store)?;
        Ok(roster)
    }

    pub fn cursor(&self) -> &CalendarCursor {
        &self.cursor
    }

    /// The cached assignments for the displayed month.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Reload the cache for the cursor's (year, month).
    pub fn refresh<S: RosterStore>(&mut self, store: &S) -> RosterResult<()> {
        self.assignments = store.list_assignments(self.cursor.year(), self.cursor.month())?;
        debug!(
            year = self.cursor.year(),
            month = self.cursor.month(),
            count = self.assignments.len(),
            "roster month loaded"
        );
        Ok(())
    }

    /// Apply a cursor move, reloading the cache if the month changed.
    fn navigate<S, F>(&mut self, store: &S, go: F) -> RosterResult<()>
    where
        S: RosterStore,
        F: FnOnce(&mut CalendarCursor),
    {
        let before = (self.cursor.year(), self.cursor.month());
        go(&mut self.cursor);
        if (self.cursor.year(), self.cursor.month()) != before {
            self.refresh(store)?;
        }
        Ok(())
    }

    pub fn previous_week<S: RosterStore>(&mut self, store: &S) -> RosterResult<()> {
        self.navigate(store, CalendarCursor::previous_week)
    }

    pub fn next_week<S: RosterStore>(&mut self, store: &S) -> RosterResult<()> {
        self.navigate(store, CalendarCursor::next_week)
    }

    pub fn jump_to_today<S: RosterStore>(
        &mut self,
        store: &S,
        today: NaiveDate,
    ) -> RosterResult<()> {
        self.navigate(store, |c| c.jump_to_today(today))
    }

    pub fn set_month<S: RosterStore>(&mut self, store: &S, month: u32) -> RosterResult<()> {
        self.navigate(store, |c| c.set_month(month))
    }

    pub fn set_year<S: RosterStore>(&mut self, store: &S, year: i32) -> RosterResult<()> {
        self.navigate(store, |c| c.set_year(year))
    }

    /// Select a week within the displayed month. Never reloads.
    pub fn set_week(&mut self, week: u32) {
        self.cursor.set_week(week);
    }

    /// The seven dates of the displayed week.
    pub fn week_dates(&self) -> [NaiveDate; 7] {
        self.cursor.week_dates()
    }

    /// The displayed week as seven day buckets.
    pub fn day_buckets(&self) -> [DayBucket<'_>; 7] {
        let dates = self.cursor.week_dates();
        let buckets = bucket_by_start_date(&dates, &self.assignments);
        let mut iter = buckets.into_iter();
        std::array::from_fn(|i| DayBucket {
            date: dates[i],
            in_month: is_in_current_month(dates[i], self.cursor.year(), self.cursor.month()),
            assignments: iter.next().unwrap_or_default(),
        })
    }

    /// Validate and persist a new assignment; the stored row joins the
    /// cache only if it starts in the displayed month.
    pub fn create_assignment<S: RosterStore>(
        &mut self,
        store: &S,
        draft: &AssignmentDraft,
    ) -> RosterResult<Assignment> {
        let new = draft.complete()?;
        let stored = store.create_assignment(&new)?;
        self.absorb(stored.clone());
        Ok(stored)
    }

    /// Merge a partial draft onto the cached row, validate, and persist.
    pub fn update_assignment<S: RosterStore>(
        &mut self,
        store: &S,
        id: i64,
        draft: &AssignmentDraft,
    ) -> RosterResult<Assignment> {
        let existing = self
            .assignments
            .iter()
            .find(|a| a.id == id)
            .ok_or(RosterError::NotFound(id))?;
        let merged = draft.apply_to(existing)?;
        let stored = store.update_assignment(id, &merged)?;
        self.assignments.retain(|a| a.id != id);
        self.absorb(stored.clone());
        Ok(stored)
    }

    /// Delete an assignment and drop it from the cache.
    pub fn delete_assignment<S: RosterStore>(&mut self, store: &S, id: i64) -> RosterResult<()> {
        store.delete_assignment(id)?;
        self.assignments.retain(|a| a.id != id);
        Ok(())
    }

    /// Keep the cache month-consistent: a row whose start moved out of the
    /// displayed month is not cached.
    fn absorb(&mut self, stored: Assignment) {
        let start = stored.starts_at.date();
        if start.year() == self.cursor.year() && start.month() == self.cursor.month() {
            self.assignments.push(stored);
        }
    }
}
