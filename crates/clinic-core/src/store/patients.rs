//! Patient database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{NewPatient, Patient};

impl Database {
    /// Register a new patient, returning the stored row.
    pub fn insert_patient(&self, new: &NewPatient) -> DbResult<Patient> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                first_name, last_name, date_of_birth, phone, email, address, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                new.first_name,
                new.last_name,
                new.date_of_birth.map(|d| d.to_string()),
                new.phone,
                new.email,
                new.address,
                new.notes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_patient(id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", id)))
    }

    /// Update an existing patient in place.
    pub fn update_patient(&self, id: i64, new: &NewPatient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                first_name = ?2,
                last_name = ?3,
                date_of_birth = ?4,
                phone = ?5,
                email = ?6,
                address = ?7,
                notes = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                new.first_name,
                new.last_name,
                new.date_of_birth.map(|d| d.to_string()),
                new.phone,
                new.email,
                new.address,
                new.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, first_name, last_name, date_of_birth, phone,
                       email, address, notes, created_at, updated_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                map_patient_row,
            )
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// Search patients by last name (prefix match).
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, last_name, date_of_birth, phone,
                   email, address, notes, created_at, updated_at
            FROM patients
            WHERE last_name LIKE ?
            ORDER BY last_name, first_name
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![pattern, limit as i64], map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, last_name, date_of_birth, phone,
                   email, address, notes, created_at, updated_at
            FROM patients
            ORDER BY last_name, first_name
            "#,
        )?;

        let rows = stmt.query_map([], map_patient_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        address: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let date_of_birth = row
            .date_of_birth
            .as_deref()
            .map(|s| s.parse::<NaiveDate>())
            .transpose()?;

        Ok(Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth,
            phone: row.phone,
            email: row.email,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_new(first: &str, last: &str) -> NewPatient {
        NewPatient {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut new = make_new("Marie", "Durand");
        new.date_of_birth = NaiveDate::from_ymd_opt(1987, 6, 12);
        new.phone = Some("0612345678".into());
        let stored = db.insert_patient(&new).unwrap();

        let retrieved = db.get_patient(stored.id).unwrap().unwrap();
        assert_eq!(retrieved.last_name, "Durand");
        assert_eq!(retrieved.date_of_birth, NaiveDate::from_ymd_opt(1987, 6, 12));
        assert_eq!(retrieved.phone, Some("0612345678".into()));
    }

    #[test]
    fn test_update_patient() {
        let db = setup_db();

        let stored = db.insert_patient(&make_new("Marie", "Durand")).unwrap();

        let mut new = make_new("Marie", "Durand");
        new.notes = Some("Allergic to penicillin".into());
        assert!(db.update_patient(stored.id, &new).unwrap());

        let retrieved = db.get_patient(stored.id).unwrap().unwrap();
        assert_eq!(retrieved.notes, Some("Allergic to penicillin".into()));
    }

    #[test]
    fn test_search_patients() {
        let db = setup_db();

        db.insert_patient(&make_new("Marie", "Durand")).unwrap();
        db.insert_patient(&make_new("Paul", "Dupont")).unwrap();
        db.insert_patient(&make_new("Luc", "Martin")).unwrap();

        let results = db.search_patients("Du", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|p| p.last_name == "Durand"));
        assert!(results.iter().any(|p| p.last_name == "Dupont"));
    }

    #[test]
    fn test_delete_patient() {
        let db = setup_db();

        let stored = db.insert_patient(&make_new("Marie", "Durand")).unwrap();
        assert!(db.delete_patient(stored.id).unwrap());
        assert!(db.get_patient(stored.id).unwrap().is_none());
    }
}
