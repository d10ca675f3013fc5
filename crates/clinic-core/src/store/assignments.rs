//! Garde (on-call assignment) database operations.

use rusqlite::{params, OptionalExtension};

use super::{decode_ts, encode_ts, Database, DbError, DbResult};
use crate::calendar::RosterStore;
use crate::models::{Assignment, NewAssignment, ShiftType};

impl Database {
    /// Insert a new assignment, returning the stored row.
    pub fn insert_assignment(&self, new: &NewAssignment) -> DbResult<Assignment> {
        self.conn.execute(
            r#"
            INSERT INTO gardes (starts_at, ends_at, physician_id, shift_type)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                encode_ts(new.starts_at),
                encode_ts(new.ends_at),
                new.physician_id,
                new.shift_type.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_assignment(id)?
            .ok_or_else(|| DbError::NotFound(format!("garde {}", id)))
    }

    /// Replace an assignment's fields, returning the stored row.
    pub fn replace_assignment(&self, id: i64, new: &NewAssignment) -> DbResult<Assignment> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE gardes SET
                starts_at = ?2,
                ends_at = ?3,
                physician_id = ?4,
                shift_type = ?5,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                encode_ts(new.starts_at),
                encode_ts(new.ends_at),
                new.physician_id,
                new.shift_type.as_str(),
            ],
        )?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("garde {}", id)));
        }

        self.get_assignment(id)?
            .ok_or_else(|| DbError::NotFound(format!("garde {}", id)))
    }

    /// Get an assignment by id.
    pub fn get_assignment(&self, id: i64) -> DbResult<Option<Assignment>> {
        self.conn
            .query_row(
                r#"
                SELECT id, starts_at, ends_at, physician_id, shift_type,
                       created_at, updated_at
                FROM gardes
                WHERE id = ?
                "#,
                [id],
                map_garde_row,
            )
            .optional()?
            .map(Assignment::try_from)
            .transpose()
    }

    /// List assignments whose start falls within the given month,
    /// ordered by start time.
    pub fn list_assignments_in_month(&self, year: i32, month: u32) -> DbResult<Vec<Assignment>> {
        let from = format!("{:04}-{:02}-01T00:00:00", year, month);
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let to = format!("{:04}-{:02}-01T00:00:00", next_year, next_month);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, starts_at, ends_at, physician_id, shift_type,
                   created_at, updated_at
            FROM gardes
            WHERE starts_at >= ?1 AND starts_at < ?2
            ORDER BY starts_at
            "#,
        )?;

        let rows = stmt.query_map(params![from, to], map_garde_row)?;

        let mut assignments = Vec::new();
        for row in rows {
            assignments.push(row?.try_into()?);
        }
        Ok(assignments)
    }

    /// Delete an assignment.
    pub fn remove_assignment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM gardes WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

impl RosterStore for Database {
    fn list_assignments(&self, year: i32, month: u32) -> DbResult<Vec<Assignment>> {
        self.list_assignments_in_month(year, month)
    }

    fn create_assignment(&self, new: &NewAssignment) -> DbResult<Assignment> {
        self.insert_assignment(new)
    }

    fn update_assignment(&self, id: i64, new: &NewAssignment) -> DbResult<Assignment> {
        self.replace_assignment(id, new)
    }

    fn delete_assignment(&self, id: i64) -> DbResult<()> {
        if !self.remove_assignment(id)? {
            return Err(DbError::NotFound(format!("garde {}", id)));
        }
        Ok(())
    }
}

/// Intermediate row struct for database mapping.
struct GardeRow {
    id: i64,
    starts_at: String,
    ends_at: String,
    physician_id: i64,
    shift_type: String,
    created_at: String,
    updated_at: String,
}

fn map_garde_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GardeRow> {
    Ok(GardeRow {
        id: row.get(0)?,
        starts_at: row.get(1)?,
        ends_at: row.get(2)?,
        physician_id: row.get(3)?,
        shift_type: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl TryFrom<GardeRow> for Assignment {
    type Error = DbError;

    fn try_from(row: GardeRow) -> Result<Self, Self::Error> {
        let shift_type = ShiftType::parse(&row.shift_type)
            .ok_or_else(|| DbError::Constraint(format!("Unknown shift type: {}", row.shift_type)))?;

        Ok(Assignment {
            id: row.id,
            starts_at: decode_ts(&row.starts_at)?,
            ends_at: decode_ts(&row.ends_at)?,
            physician_id: row.physician_id,
            shift_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
