//! Clinic Administration Core Library
//!
//! Local-first clinic administration: patient registry, appointment book,
//! consultation records, user accounts, and the on-call roster calendar.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!                  │        Clinic (facade)       │
//!                  │  Session · Navigator · DB    │
//!                  └──────────────┬───────────────┘
//!                                 │
//!          ┌──────────────┬───────┴───────┬──────────────┐
//!          ▼              ▼               ▼              ▼
//!      patients      appointments   RosterCalendar    reports
//!      consults      (lifecycle)    cursor + cache   JSON / CSV
//!          │              │               │              │
//!          └──────────────┴───────┬───────┴──────────────┘
//!                                 ▼
//!                          SQLite (store)
//! ```
//!
//! # Core Principle
//!
//! **The roster cache never disagrees with the cursor.** Navigation that
//! lands on a different month reloads before returning, and mutations touch
//! the cache only after the store has accepted them.
//!
//! # Modules
//!
//! - [`calendar`]: ISO-week arithmetic, calendar cursor, roster engine
//! - [`models`]: Domain types (Patient, Appointment, Assignment, etc.)
//! - [`store`]: SQLite persistence layer
//! - [`session`]: Login sessions with salted password digests
//! - [`view`]: Screen enum and role-gated navigation
//! - [`report`]: Monthly roster and activity summaries

pub mod calendar;
pub mod models;
pub mod report;
pub mod session;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use calendar::{CalendarCursor, DayBucket, RosterCalendar, RosterError, RosterStore};
pub use models::{
    Appointment, AppointmentStatus, Assignment, AssignmentDraft, Consultation, NewAppointment,
    NewAssignment, NewConsultation, NewPatient, Patient, Physician, Role, ShiftType, User,
    ValidationError,
};
pub use report::{ActivityReporter, MonthlyActivityReport, MonthlyRosterReport, RosterReporter};
pub use session::{AuthError, Session, SessionUser};
pub use store::{Database, DbError};
pub use view::{Navigator, Screen};

use chrono::NaiveDate;
use std::path::Path;

// =========================================================================
// Top-Level Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No open session")]
    NotLoggedIn,

    #[error("Operation requires the {0} role")]
    Forbidden(&'static str),
}

// =========================================================================
// Main API Object
// =========================================================================

/// The application facade: one database, at most one session, the current
/// screen, and the roster calendar.
///
/// Reads are open; mutations require a live session; user management
/// requires an admin session. These gates shape the UI — authorization
/// proper belongs to whatever server this clinic syncs with.
pub struct Clinic {
    db: Database,
    session: Option<Session>,
    navigator: Navigator,
    roster: RosterCalendar,
}

impl Clinic {
    /// Open or create a clinic database at the given path, with the roster
    /// positioned on the week containing `today`.
    pub fn open<P: AsRef<Path>>(path: P, today: NaiveDate) -> Result<Self, ClinicError> {
        let db = Database::open(path)?;
        let roster = RosterCalendar::open(&db, today)?;
        Ok(Self {
            db,
            session: None,
            navigator: Navigator::new(),
            roster,
        })
    }

    /// In-memory clinic (for testing).
    pub fn open_in_memory(today: NaiveDate) -> Result<Self, ClinicError> {
        let db = Database::open_in_memory()?;
        let roster = RosterCalendar::open(&db, today)?;
        Ok(Self {
            db,
            session: None,
            navigator: Navigator::new(),
            roster,
        })
    }

    /// Direct store access, for callers the facade is too narrow for.
    pub fn db(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Authenticate and open a session, replacing any existing one.
    pub fn login(&mut self, username: &str, password: &str) -> Result<SessionUser, ClinicError> {
        let session = Session::login(&self.db, username, password)?;
        let user = session.user().clone();
        if let Some(previous) = self.session.take() {
            previous.logout();
        }
        self.session = Some(session);
        self.navigator = Navigator::new();
        Ok(user)
    }

    /// Close the session, if any, and return to the dashboard.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            session.logout();
        }
        self.navigator = Navigator::new();
    }

    /// The logged-in user, if a session is open.
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(Session::user)
    }

    fn require_session(&self) -> Result<&Session, ClinicError> {
        self.session.as_ref().ok_or(ClinicError::NotLoggedIn)
    }

    fn require_admin(&self) -> Result<&Session, ClinicError> {
        let session = self.require_session()?;
        if session.role() != Role::Admin {
            return Err(ClinicError::Forbidden("admin"));
        }
        Ok(session)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn current_screen(&self) -> Screen {
        self.navigator.current()
    }

    /// Screens available to the logged-in user, in menu order.
    pub fn menu(&self) -> Result<Vec<Screen>, ClinicError> {
        Ok(Screen::menu_for(self.require_session()?.role()))
    }

    /// Switch screens; fails if the role does not allow the target.
    pub fn go_to(&mut self, screen: Screen) -> Result<(), ClinicError> {
        let role = self.require_session()?.role();
        if !self.navigator.go_to(screen, role) {
            return Err(ClinicError::Forbidden("admin"));
        }
        Ok(())
    }

    // =========================================================================
    // Roster Calendar
    // =========================================================================

    /// The calendar cursor: displayed (year, month, week).
    pub fn roster_cursor(&self) -> &CalendarCursor {
        self.roster.cursor()
    }

    /// The displayed week as seven day buckets.
    pub fn roster_week(&self) -> [DayBucket<'_>; 7] {
        self.roster.day_buckets()
    }

    pub fn roster_previous_week(&mut self) -> Result<(), ClinicError> {
        Ok(self.roster.previous_week(&self.db)?)
    }

    pub fn roster_next_week(&mut self) -> Result<(), ClinicError> {
        Ok(self.roster.next_week(&self.db)?)
    }

    pub fn roster_jump_to_today(&mut self, today: NaiveDate) -> Result<(), ClinicError> {
        Ok(self.roster.jump_to_today(&self.db, today)?)
    }

    pub fn roster_set_month(&mut self, month: u32) -> Result<(), ClinicError> {
        Ok(self.roster.set_month(&self.db, month)?)
    }

    pub fn roster_set_year(&mut self, year: i32) -> Result<(), ClinicError> {
        Ok(self.roster.set_year(&self.db, year)?)
    }

    pub fn roster_set_week(&mut self, week: u32) {
        self.roster.set_week(week);
    }

    /// Validate and persist a new assignment.
    pub fn create_assignment(&mut self, draft: &AssignmentDraft) -> Result<Assignment, ClinicError> {
        self.require_session()?;
        Ok(self.roster.create_assignment(&self.db, draft)?)
    }

    /// Merge a partial draft onto an existing assignment and persist.
    pub fn update_assignment(
        &mut self,
        id: i64,
        draft: &AssignmentDraft,
    ) -> Result<Assignment, ClinicError> {
        self.require_session()?;
        Ok(self.roster.update_assignment(&self.db, id, draft)?)
    }

    pub fn delete_assignment(&mut self, id: i64) -> Result<(), ClinicError> {
        self.require_session()?;
        Ok(self.roster.delete_assignment(&self.db, id)?)
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Register a new patient.
    pub fn register_patient(&self, new: &NewPatient) -> Result<Patient, ClinicError> {
        self.require_session()?;
        new.validate()?;
        Ok(self.db.insert_patient(new)?)
    }

    /// Update a patient's record in place.
    pub fn update_patient(&self, id: i64, new: &NewPatient) -> Result<bool, ClinicError> {
        self.require_session()?;
        new.validate()?;
        Ok(self.db.update_patient(id, new)?)
    }

    pub fn patient(&self, id: i64) -> Result<Option<Patient>, ClinicError> {
        Ok(self.db.get_patient(id)?)
    }

    /// Search patients by name.
    pub fn search_patients(&self, query: &str, limit: usize) -> Result<Vec<Patient>, ClinicError> {
        Ok(self.db.search_patients(query, limit)?)
    }

    pub fn list_patients(&self) -> Result<Vec<Patient>, ClinicError> {
        Ok(self.db.list_patients()?)
    }

    pub fn delete_patient(&self, id: i64) -> Result<bool, ClinicError> {
        self.require_session()?;
        Ok(self.db.delete_patient(id)?)
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Book an appointment.
    pub fn book_appointment(&self, new: &NewAppointment) -> Result<Appointment, ClinicError> {
        self.require_session()?;
        new.validate()?;
        Ok(self.db.insert_appointment(new)?)
    }

    /// Move an appointment through its lifecycle.
    pub fn set_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<bool, ClinicError> {
        self.require_session()?;
        Ok(self.db.set_appointment_status(id, status)?)
    }

    /// The day's schedule, ordered by time.
    pub fn appointments_on(&self, day: NaiveDate) -> Result<Vec<Appointment>, ClinicError> {
        Ok(self.db.list_appointments_on(day)?)
    }

    /// A patient's appointment history, most recent first.
    pub fn patient_appointments(&self, patient_id: i64) -> Result<Vec<Appointment>, ClinicError> {
        Ok(self.db.list_appointments_for_patient(patient_id)?)
    }

    pub fn delete_appointment(&self, id: i64) -> Result<bool, ClinicError> {
        self.require_session()?;
        Ok(self.db.delete_appointment(id)?)
    }

    // =========================================================================
    // Consultations
    // =========================================================================

    /// Record a consultation.
    pub fn record_consultation(&self, new: &NewConsultation) -> Result<Consultation, ClinicError> {
        self.require_session()?;
        new.validate()?;
        Ok(self.db.insert_consultation(new)?)
    }

    /// Amend the free-form notes on an existing consultation. The clinical
    /// fields are append-only once recorded.
    pub fn amend_consultation_notes(
        &self,
        id: i64,
        notes: Option<&str>,
    ) -> Result<bool, ClinicError> {
        self.require_session()?;
        Ok(self.db.amend_consultation_notes(id, notes)?)
    }

    /// A patient's consultation history, most recent first.
    pub fn patient_consultations(&self, patient_id: i64) -> Result<Vec<Consultation>, ClinicError> {
        Ok(self.db.list_consultations_for_patient(patient_id)?)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user account. Admin only.
    pub fn create_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
        password: &str,
    ) -> Result<User, ClinicError> {
        self.require_admin()?;
        Ok(self
            .db
            .create_user(username, first_name, last_name, role, password)?)
    }

    /// List all user accounts. Admin only.
    pub fn list_users(&self) -> Result<Vec<User>, ClinicError> {
        self.require_admin()?;
        Ok(self.db.list_users()?)
    }

    /// Reset a user's password. Admin only.
    pub fn set_user_password(&self, id: i64, password: &str) -> Result<bool, ClinicError> {
        self.require_admin()?;
        Ok(self.db.set_user_password(id, password)?)
    }

    /// Delete a user account. Admin only.
    pub fn delete_user(&self, id: i64) -> Result<bool, ClinicError> {
        self.require_admin()?;
        Ok(self.db.delete_user(id)?)
    }

    /// The physician directory, as consumed by selection controls.
    pub fn list_physicians(&self) -> Result<Vec<Physician>, ClinicError> {
        Ok(self.db.list_physicians()?)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Per-physician on-call summary for a month.
    pub fn monthly_roster_report(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyRosterReport, ClinicError> {
        Ok(RosterReporter::new(&self.db).monthly_roster(year, month)?)
    }

    /// Appointment and consultation volume for a month.
    pub fn monthly_activity_report(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyActivityReport, ClinicError> {
        Ok(ActivityReporter::new(&self.db).monthly_activity(year, month)?)
    }
}
