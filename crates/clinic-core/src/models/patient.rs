//! Patient registry models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identifier
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Display name, last name first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Patient data for registration or in-place update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewPatient {
    /// Required-field validation before submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("last_name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_names() {
        let mut new = NewPatient {
            first_name: "Marie".into(),
            last_name: "Durand".into(),
            ..Default::default()
        };
        assert!(new.validate().is_ok());

        new.last_name = "  ".into();
        assert_eq!(new.validate(), Err(ValidationError::EmptyField("last_name")));
    }

    #[test]
    fn test_full_name() {
        let patient = Patient {
            id: 1,
            first_name: "Marie".into(),
            last_name: "Durand".into(),
            date_of_birth: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(patient.full_name(), "Durand Marie");
    }
}
