//! Consultation (medical record) models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A consultation record: one examination of one patient by one physician.
///
/// Records are append-oriented; the clinical text fields are never rewritten
/// after entry, only the optional notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    /// Store-assigned identifier
    pub id: i64,
    /// Patient reference
    pub patient_id: i64,
    /// Examining physician reference
    pub physician_id: i64,
    /// Examination time (local clinic time)
    pub examined_at: NaiveDateTime,
    /// Visit reason
    pub reason: String,
    /// Clinical observations
    pub observations: String,
    /// Diagnosis
    pub diagnosis: String,
    /// Prescribed treatment
    pub treatment: String,
    /// Follow-up notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

/// Consultation data for entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewConsultation {
    pub patient_id: i64,
    pub physician_id: i64,
    pub examined_at: NaiveDateTime,
    pub reason: String,
    pub observations: String,
    pub diagnosis: String,
    pub treatment: String,
    pub notes: Option<String>,
}

impl NewConsultation {
    /// Required-field validation before submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::EmptyField("reason"));
        }
        if self.diagnosis.trim().is_empty() {
            return Err(ValidationError::EmptyField("diagnosis"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_new() -> NewConsultation {
        NewConsultation {
            patient_id: 1,
            physician_id: 2,
            examined_at: NaiveDate::from_ymd_opt(2024, 4, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            reason: "Persistent cough".into(),
            observations: "Clear lungs, mild throat irritation".into(),
            diagnosis: "Seasonal allergy".into(),
            treatment: "Antihistamine, 10 days".into(),
            notes: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(make_new().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_diagnosis() {
        let mut new = make_new();
        new.diagnosis = String::new();
        assert_eq!(
            new.validate(),
            Err(ValidationError::EmptyField("diagnosis"))
        );
    }
}
