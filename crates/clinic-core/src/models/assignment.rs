//! On-call assignment (garde) models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Shift classification. Affects display styling only, never scheduling logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
    Weekend,
}

impl ShiftType {
    /// Canonical lowercase label, used for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
            ShiftType::Weekend => "weekend",
        }
    }

    /// Parse a canonical label back into a shift type.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(ShiftType::Day),
            "night" => Some(ShiftType::Night),
            "weekend" => Some(ShiftType::Weekend),
            _ => None,
        }
    }

    /// All shift types, for selection controls.
    pub fn all() -> [ShiftType; 3] {
        [ShiftType::Day, ShiftType::Night, ShiftType::Weekend]
    }
}

/// A scheduled on-call shift for one physician over a time interval.
///
/// Invariant: `starts_at < ends_at`, enforced at validation before any
/// store mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    /// Store-assigned identifier
    pub id: i64,
    /// Shift start (local clinic time)
    pub starts_at: NaiveDateTime,
    /// Shift end (local clinic time)
    pub ends_at: NaiveDateTime,
    /// Assigned physician (directory reference, not owned)
    pub physician_id: i64,
    /// Display tag
    pub shift_type: ShiftType,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// A validated assignment ready for the store (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAssignment {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub physician_id: i64,
    pub shift_type: ShiftType,
}

/// Form-shaped assignment data: every field optional until validated.
///
/// Used both for creation (all fields required, see [`complete`]) and for
/// partial updates (missing fields fall back to the existing row, see
/// [`apply_to`]).
///
/// [`complete`]: AssignmentDraft::complete
/// [`apply_to`]: AssignmentDraft::apply_to
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssignmentDraft {
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub physician_id: Option<i64>,
    pub shift_type: Option<ShiftType>,
}

impl AssignmentDraft {
    /// Validate a creation form: all fields present, end strictly after start.
    pub fn complete(&self) -> Result<NewAssignment, ValidationError> {
        let starts_at = self
            .starts_at
            .ok_or(ValidationError::MissingField("starts_at"))?;
        let ends_at = self
            .ends_at
            .ok_or(ValidationError::MissingField("ends_at"))?;
        let physician_id = self
            .physician_id
            .ok_or(ValidationError::MissingField("physician_id"))?;
        let shift_type = self
            .shift_type
            .ok_or(ValidationError::MissingField("shift_type"))?;

        check_interval(starts_at, ends_at)?;

        Ok(NewAssignment {
            starts_at,
            ends_at,
            physician_id,
            shift_type,
        })
    }

    /// Merge this draft onto an existing assignment for a partial update.
    ///
    /// Fields left `None` keep the existing value; the start/end ordering is
    /// re-validated against the merged result.
    pub fn apply_to(&self, existing: &Assignment) -> Result<NewAssignment, ValidationError> {
        let starts_at = self.starts_at.unwrap_or(existing.starts_at);
        let ends_at = self.ends_at.unwrap_or(existing.ends_at);

        check_interval(starts_at, ends_at)?;

        Ok(NewAssignment {
            starts_at,
            ends_at,
            physician_id: self.physician_id.unwrap_or(existing.physician_id),
            shift_type: self.shift_type.unwrap_or(existing.shift_type),
        })
    }
}

fn check_interval(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<(), ValidationError> {
    if ends_at <= starts_at {
        return Err(ValidationError::EndNotAfterStart);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn full_draft() -> AssignmentDraft {
        AssignmentDraft {
            starts_at: Some(dt(2024, 3, 5, 8)),
            ends_at: Some(dt(2024, 3, 5, 18)),
            physician_id: Some(7),
            shift_type: Some(ShiftType::Day),
        }
    }

    #[test]
    fn test_complete_valid_draft() {
        let new = full_draft().complete().unwrap();
        assert_eq!(new.physician_id, 7);
        assert_eq!(new.shift_type, ShiftType::Day);
    }

    #[test]
    fn test_complete_missing_fields() {
        let mut draft = full_draft();
        draft.physician_id = None;
        assert_eq!(
            draft.complete(),
            Err(ValidationError::MissingField("physician_id"))
        );

        let mut draft = full_draft();
        draft.ends_at = None;
        assert_eq!(
            draft.complete(),
            Err(ValidationError::MissingField("ends_at"))
        );
    }

    #[test]
    fn test_end_must_be_after_start() {
        let mut draft = full_draft();
        draft.ends_at = draft.starts_at;
        assert_eq!(draft.complete(), Err(ValidationError::EndNotAfterStart));

        draft.ends_at = Some(dt(2024, 3, 5, 6));
        assert_eq!(draft.complete(), Err(ValidationError::EndNotAfterStart));
    }

    #[test]
    fn test_apply_to_merges_partial_fields() {
        let existing = Assignment {
            id: 1,
            starts_at: dt(2024, 3, 5, 8),
            ends_at: dt(2024, 3, 5, 18),
            physician_id: 7,
            shift_type: ShiftType::Day,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let patch = AssignmentDraft {
            shift_type: Some(ShiftType::Night),
            ..Default::default()
        };
        let merged = patch.apply_to(&existing).unwrap();
        assert_eq!(merged.shift_type, ShiftType::Night);
        assert_eq!(merged.starts_at, existing.starts_at);
        assert_eq!(merged.physician_id, 7);
    }

    #[test]
    fn test_apply_to_revalidates_interval() {
        let existing = Assignment {
            id: 1,
            starts_at: dt(2024, 3, 5, 8),
            ends_at: dt(2024, 3, 5, 18),
            physician_id: 7,
            shift_type: ShiftType::Day,
            created_at: String::new(),
            updated_at: String::new(),
        };

        // Moving the start past the kept end must fail
        let patch = AssignmentDraft {
            starts_at: Some(dt(2024, 3, 5, 20)),
            ..Default::default()
        };
        assert_eq!(patch.apply_to(&existing), Err(ValidationError::EndNotAfterStart));
    }

    #[test]
    fn test_shift_type_round_trip() {
        for shift in ShiftType::all() {
            assert_eq!(ShiftType::parse(shift.as_str()), Some(shift));
        }
        assert_eq!(ShiftType::parse("afternoon"), None);
    }
}
