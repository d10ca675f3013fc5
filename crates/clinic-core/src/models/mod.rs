//! Domain models for the clinic administration system.

mod appointment;
mod assignment;
mod consultation;
mod patient;
mod user;

pub use appointment::*;
pub use assignment::*;
pub use consultation::*;
pub use patient::*;
pub use user::*;

use thiserror::Error;

/// Client-side validation errors, raised before anything reaches the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("End must be strictly after start")]
    EndNotAfterStart,

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}

/// Current timestamp in RFC3339, used for audit fields.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
