//! Consultation (medical record) database operations.

use rusqlite::{params, OptionalExtension};

use super::{decode_ts, encode_ts, Database, DbError, DbResult};
use crate::models::{Consultation, NewConsultation};

impl Database {
    /// Record a consultation, returning the stored row.
    pub fn insert_consultation(&self, new: &NewConsultation) -> DbResult<Consultation> {
        self.conn.execute(
            r#"
            INSERT INTO consultations (
                patient_id, physician_id, examined_at, reason,
                observations, diagnosis, treatment, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                new.patient_id,
                new.physician_id,
                encode_ts(new.examined_at),
                new.reason,
                new.observations,
                new.diagnosis,
                new.treatment,
                new.notes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_consultation(id)?
            .ok_or_else(|| DbError::NotFound(format!("consultation {}", id)))
    }

    /// Get a consultation by id.
    pub fn get_consultation(&self, id: i64) -> DbResult<Option<Consultation>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, physician_id, examined_at, reason,
                       observations, diagnosis, treatment, notes, created_at
                FROM consultations
                WHERE id = ?
                "#,
                [id],
                map_consultation_row,
            )
            .optional()?
            .map(Consultation::try_from)
            .transpose()
    }

    /// Amend the follow-up notes of a consultation. The clinical text
    /// fields are append-only and have no update path.
    pub fn amend_consultation_notes(&self, id: i64, notes: Option<&str>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE consultations SET notes = ?2 WHERE id = ?1",
            params![id, notes],
        )?;
        Ok(rows_affected > 0)
    }

    /// List a patient's consultations, most recent first.
    pub fn list_consultations_for_patient(&self, patient_id: i64) -> DbResult<Vec<Consultation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, physician_id, examined_at, reason,
                   observations, diagnosis, treatment, notes, created_at
            FROM consultations
            WHERE patient_id = ?
            ORDER BY examined_at DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], map_consultation_row)?;

        let mut consultations = Vec::new();
        for row in rows {
            consultations.push(row?.try_into()?);
        }
        Ok(consultations)
    }

    /// List consultations recorded by a physician within a month.
    pub fn list_consultations_in_month(&self, year: i32, month: u32) -> DbResult<Vec<Consultation>> {
        let from = format!("{:04}-{:02}-01T00:00:00", year, month);
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let to = format!("{:04}-{:02}-01T00:00:00", next_year, next_month);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, physician_id, examined_at, reason,
                   observations, diagnosis, treatment, notes, created_at
            FROM consultations
            WHERE examined_at >= ?1 AND examined_at < ?2
            ORDER BY examined_at
            "#,
        )?;

        let rows = stmt.query_map(params![from, to], map_consultation_row)?;

        let mut consultations = Vec::new();
        for row in rows {
            consultations.push(row?.try_into()?);
        }
        Ok(consultations)
    }

    /// Delete a consultation.
    pub fn delete_consultation(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM consultations WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct ConsultationRow {
    id: i64,
    patient_id: i64,
    physician_id: i64,
    examined_at: String,
    reason: String,
    observations: String,
    diagnosis: String,
    treatment: String,
    notes: Option<String>,
    created_at: String,
}

fn map_consultation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConsultationRow> {
    Ok(ConsultationRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        physician_id: row.get(2)?,
        examined_at: row.get(3)?,
        reason: row.get(4)?,
        observations: row.get(5)?,
        diagnosis: row.get(6)?,
        treatment: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl TryFrom<ConsultationRow> for Consultation {
    type Error = DbError;

    fn try_from(row: ConsultationRow) -> Result<Self, Self::Error> {
        Ok(Consultation {
            id: row.id,
            patient_id: row.patient_id,
            physician_id: row.physician_id,
            examined_at: decode_ts(&row.examined_at)?,
            reason: row.reason,
            observations: row.observations,
            diagnosis: row.diagnosis,
            treatment: row.treatment,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
