//! Monthly clinic activity summary.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::models::AppointmentStatus;
use crate::store::{Database, DbResult};

/// Appointment and consultation volume for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyActivityReport {
    pub year: i32,
    pub month: u32,
    /// Report generation timestamp
    pub generated_at: String,
    /// Appointments booked for the month, by lifecycle status
    pub appointments_scheduled: u32,
    pub appointments_completed: u32,
    pub appointments_cancelled: u32,
    /// Consultations recorded in the month
    pub consultations: u32,
}

impl MonthlyActivityReport {
    /// Appointments across all statuses.
    pub fn total_appointments(&self) -> u32 {
        self.appointments_scheduled + self.appointments_completed + self.appointments_cancelled
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format (single data row).
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(
            "year,month,appointments_scheduled,appointments_completed,appointments_cancelled,consultations\n",
        );
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            self.year,
            self.month,
            self.appointments_scheduled,
            self.appointments_completed,
            self.appointments_cancelled,
            self.consultations,
        ));
        csv
    }
}

/// Activity reporter.
pub struct ActivityReporter<'a> {
    db: &'a Database,
}

impl<'a> ActivityReporter<'a> {
    /// Create a new activity reporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Summarize a month's appointment and consultation volume.
    pub fn monthly_activity(&self, year: i32, month: u32) -> DbResult<MonthlyActivityReport> {
        let (from, to) = month_bounds(year, month);

        let mut appointments_scheduled = 0;
        let mut appointments_completed = 0;
        let mut appointments_cancelled = 0;

        let mut stmt = self.db.conn().prepare(
            r#"
            SELECT status, COUNT(*)
            FROM appointments
            WHERE scheduled_at >= ?1 AND scheduled_at < ?2
            GROUP BY status
            "#,
        )?;
        let rows = stmt.query_map(params![from, to], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            match AppointmentStatus::parse(&status) {
                Some(AppointmentStatus::Scheduled) => appointments_scheduled = count,
                Some(AppointmentStatus::Completed) => appointments_completed = count,
                Some(AppointmentStatus::Cancelled) => appointments_cancelled = count,
                None => {}
            }
        }

        let consultations: u32 = self.db.conn().query_row(
            "SELECT COUNT(*) FROM consultations WHERE examined_at >= ?1 AND examined_at < ?2",
            params![from, to],
            |row| row.get(0),
        )?;

        Ok(MonthlyActivityReport {
            year,
            month,
            generated_at: chrono::Utc::now().to_rfc3339(),
            appointments_scheduled,
            appointments_completed,
            appointments_cancelled,
            consultations,
        })
    }
}

/// Timestamp bounds covering one month, half-open.
fn month_bounds(year: i32, month: u32) -> (String, String) {
    let from = format!("{:04}-{:02}-01T00:00:00", year, month);
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let to = format!("{:04}-{:02}-01T00:00:00", next_year, next_month);
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAppointment, NewConsultation, NewPatient, Role};
    use chrono::NaiveDate;

    fn dt(m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn setup_db() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let physician = db
            .create_user("amoreau", "Anne", "Moreau", Role::Physician, "x")
            .unwrap();
        let patient = db
            .insert_patient(&NewPatient {
                first_name: "Marie".into(),
                last_name: "Durand".into(),
                ..Default::default()
            })
            .unwrap();
        (db, patient.id, physician.id)
    }

    #[test]
    fn test_monthly_activity() {
        let (db, patient_id, physician_id) = setup_db();

        let a1 = db
            .insert_appointment(&NewAppointment {
                patient_id,
                physician_id,
                scheduled_at: dt(4, 10, 9),
                duration_minutes: 30,
                reason: "Checkup".into(),
            })
            .unwrap();
        db.insert_appointment(&NewAppointment {
            patient_id,
            physician_id,
            scheduled_at: dt(4, 12, 9),
            duration_minutes: 30,
            reason: "Checkup".into(),
        })
        .unwrap();
        db.set_appointment_status(a1.id, AppointmentStatus::Completed)
            .unwrap();

        db.insert_consultation(&NewConsultation {
            patient_id,
            physician_id,
            examined_at: dt(4, 10, 9),
            reason: "Cough".into(),
            observations: String::new(),
            diagnosis: "Allergy".into(),
            treatment: String::new(),
            notes: None,
        })
        .unwrap();

        // Out of the reported month
        db.insert_appointment(&NewAppointment {
            patient_id,
            physician_id,
            scheduled_at: dt(5, 2, 9),
            duration_minutes: 30,
            reason: "Checkup".into(),
        })
        .unwrap();

        let report = ActivityReporter::new(&db).monthly_activity(2024, 4).unwrap();
        assert_eq!(report.appointments_scheduled, 1);
        assert_eq!(report.appointments_completed, 1);
        assert_eq!(report.appointments_cancelled, 0);
        assert_eq!(report.total_appointments(), 2);
        assert_eq!(report.consultations, 1);
    }

    #[test]
    fn test_csv_output() {
        let (db, _, _) = setup_db();

        let report = ActivityReporter::new(&db).monthly_activity(2024, 4).unwrap();
        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("year,month"));
        assert!(lines[1].starts_with("2024,4"));
    }
}
