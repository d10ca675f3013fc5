//! Appointment scheduling models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked, not yet seen
    Scheduled,
    /// Patient was seen
    Completed,
    /// Cancelled before being seen
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// A booked appointment slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Store-assigned identifier
    pub id: i64,
    /// Patient reference
    pub patient_id: i64,
    /// Physician reference
    pub physician_id: i64,
    /// Slot start (local clinic time)
    pub scheduled_at: NaiveDateTime,
    /// Slot length in minutes
    pub duration_minutes: u32,
    /// Visit reason
    pub reason: String,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Appointment data for booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub physician_id: i64,
    pub scheduled_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub reason: String,
}

impl NewAppointment {
    /// Required-field validation before submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::EmptyField("reason"));
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::MissingField("duration_minutes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_new() -> NewAppointment {
        NewAppointment {
            patient_id: 1,
            physician_id: 2,
            scheduled_at: NaiveDate::from_ymd_opt(2024, 4, 10)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            duration_minutes: 30,
            reason: "Annual checkup".into(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(make_new().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_reason() {
        let mut new = make_new();
        new.reason = " ".into();
        assert_eq!(new.validate(), Err(ValidationError::EmptyField("reason")));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut new = make_new();
        new.duration_minutes = 0;
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
    }
}
