//! Monthly on-call roster summary.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::models::ShiftType;
use crate::store::{Database, DbResult};

/// One physician's on-call load for the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterLine {
    /// Physician reference
    pub physician_id: i64,
    /// Directory display name; falls back to the raw id if the account
    /// was deleted after the assignments were made
    pub physician_name: String,
    /// Day shifts
    pub day_shifts: u32,
    /// Night shifts
    pub night_shifts: u32,
    /// Weekend shifts
    pub weekend_shifts: u32,
}

impl RosterLine {
    /// Total shifts across all types.
    pub fn total(&self) -> u32 {
        self.day_shifts + self.night_shifts + self.weekend_shifts
    }
}

/// Per-physician on-call summary for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRosterReport {
    pub year: i32,
    pub month: u32,
    /// Report generation timestamp
    pub generated_at: String,
    /// One line per physician with at least one assignment, ordered by name
    pub lines: Vec<RosterLine>,
    /// Total assignments in the month
    pub total_assignments: usize,
}

impl MonthlyRosterReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("year,month,physician,day_shifts,night_shifts,weekend_shifts,total\n");

        // Lines
        for line in &self.lines {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                self.year,
                self.month,
                escape_csv(&line.physician_name),
                line.day_shifts,
                line.night_shifts,
                line.weekend_shifts,
                line.total(),
            ));
        }

        csv
    }
}

/// Roster reporter.
pub struct RosterReporter<'a> {
    db: &'a Database,
}

impl<'a> RosterReporter<'a> {
    /// Create a new roster reporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Summarize a month's assignments per physician.
    pub fn monthly_roster(&self, year: i32, month: u32) -> DbResult<MonthlyRosterReport> {
        let assignments = self.db.list_assignments_in_month(year, month)?;
        let physicians = self.db.list_physicians()?;

        let mut lines: Vec<RosterLine> = Vec::new();
        for assignment in &assignments {
            let idx = match lines
                .iter()
                .position(|l| l.physician_id == assignment.physician_id)
            {
                Some(idx) => idx,
                None => {
                    let name = physicians
                        .iter()
                        .find(|p| p.id == assignment.physician_id)
                        .map(|p| p.full_name())
                        .unwrap_or_else(|| format!("#{}", assignment.physician_id));
                    lines.push(RosterLine {
                        physician_id: assignment.physician_id,
                        physician_name: name,
                        day_shifts: 0,
                        night_shifts: 0,
                        weekend_shifts: 0,
                    });
                    lines.len() - 1
                }
            };
            let line = &mut lines[idx];

            match assignment.shift_type {
                ShiftType::Day => line.day_shifts += 1,
                ShiftType::Night => line.night_shifts += 1,
                ShiftType::Weekend => line.weekend_shifts += 1,
            }
        }

        lines.sort_by(|a, b| a.physician_name.cmp(&b.physician_name));

        Ok(MonthlyRosterReport {
            year,
            month,
            generated_at: chrono::Utc::now().to_rfc3339(),
            total_assignments: assignments.len(),
            lines,
        })
    }
}
