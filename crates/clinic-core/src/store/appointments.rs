//! Appointment database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{decode_ts, encode_ts, Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};

impl Database {
    /// Book a new appointment, returning the stored row.
    pub fn insert_appointment(&self, new: &NewAppointment) -> DbResult<Appointment> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                patient_id, physician_id, scheduled_at, duration_minutes, reason
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                new.patient_id,
                new.physician_id,
                encode_ts(new.scheduled_at),
                new.duration_minutes,
                new.reason,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_appointment(id)?
            .ok_or_else(|| DbError::NotFound(format!("appointment {}", id)))
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, physician_id, scheduled_at, duration_minutes,
                       reason, status, created_at, updated_at
                FROM appointments
                WHERE id = ?
                "#,
                [id],
                map_appointment_row,
            )
            .optional()?
            .map(Appointment::try_from)
            .transpose()
    }

    /// Change an appointment's lifecycle status.
    pub fn set_appointment_status(&self, id: i64, status: AppointmentStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE appointments SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    /// List appointments scheduled on a given day, ordered by time.
    pub fn list_appointments_on(&self, day: NaiveDate) -> DbResult<Vec<Appointment>> {
        let from = format!("{}T00:00:00", day);
        let to = format!("{}T00:00:00", day + chrono::Duration::days(1));

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, physician_id, scheduled_at, duration_minutes,
                   reason, status, created_at, updated_at
            FROM appointments
            WHERE scheduled_at >= ?1 AND scheduled_at < ?2
            ORDER BY scheduled_at
            "#,
        )?;

        let rows = stmt.query_map(params![from, to], map_appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// List all appointments for a patient, most recent first.
    pub fn list_appointments_for_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, physician_id, scheduled_at, duration_minutes,
                   reason, status, created_at, updated_at
            FROM appointments
            WHERE patient_id = ?
            ORDER BY scheduled_at DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], map_appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: i64,
    patient_id: i64,
    physician_id: i64,
    scheduled_at: String,
    duration_minutes: u32,
    reason: String,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        physician_id: row.get(2)?,
        scheduled_at: row.get(3)?,
        duration_minutes: row.get(4)?,
        reason: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            DbError::Constraint(format!("Unknown appointment status: {}", row.status))
        })?;

        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            physician_id: row.physician_id,
            scheduled_at: decode_ts(&row.scheduled_at)?,
            duration_minutes: row.duration_minutes,
            reason: row.reason,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
