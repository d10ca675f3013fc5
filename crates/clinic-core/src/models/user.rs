//! User accounts and the physician directory.

use serde::{Deserialize, Serialize};

/// Account role, gating which screens and operations are available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Physician,
    Receptionist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Physician => "physician",
            Role::Receptionist => "receptionist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "physician" => Some(Role::Physician),
            "receptionist" => Some(Role::Receptionist),
            _ => None,
        }
    }
}

/// A user account. Credential material stays in this type and is never
/// copied into session state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Store-assigned identifier
    pub id: i64,
    /// Login name, unique
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Account role
    pub role: Role,
    /// Salted SHA-256 digest of the password, hex-encoded
    pub password_hash: String,
    /// Per-user salt
    pub password_salt: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl User {
    /// Display name, last name first.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// A physician directory entry, as exposed to selection controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Physician {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Physician {
    /// Display name with the customary title.
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.last_name, self.first_name)
    }
}
