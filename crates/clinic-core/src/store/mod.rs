//! SQLite persistence layer for the clinic.

mod schema;
mod appointments;
mod assignments;
mod consultations;
mod patients;
mod users;

pub use schema::*;
#[allow(unused_imports)]
pub use appointments::*;
#[allow(unused_imports)]
pub use assignments::*;
#[allow(unused_imports)]
pub use consultations::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use users::*;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(&path)?;
        let db = Self { conn };
        db.initialize()?;
        debug!(path = %path.as_ref().display(), "database opened");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Timestamp column format: second precision, local clinic time.
const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Encode a timestamp for a TEXT column.
pub(crate) fn encode_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Decode a timestamp from a TEXT column.
pub(crate) fn decode_ts(s: &str) -> DbResult<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, TS_FORMAT)?)
}
