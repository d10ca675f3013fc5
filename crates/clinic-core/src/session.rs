//! Explicit session context.
//!
//! Authentication state is an owned value handed to whoever needs it, with
//! explicit login/logout transitions. There is no process-global current
//! user and nothing is written to ambient storage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::models::{now_rfc3339, Role, User};
use crate::store::{Database, DbError};

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password; callers get no hint which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}

/// The logged-in user as carried by a session. No credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.full_name(),
            role: user.role,
        }
    }
}

/// A live login session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    user: SessionUser,
    opened_at: String,
}

impl Session {
    /// Verify credentials against the user store and open a session.
    pub fn login(db: &Database, username: &str, password: &str) -> Result<Session, AuthError> {
        let user = db
            .get_user_by_username(username)?
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(&user.password_salt, password) != user.password_hash {
            return Err(AuthError::InvalidCredentials);
        }

        info!(username, role = user.role.as_str(), "session opened");
        Ok(Session {
            user: SessionUser::from(&user),
            opened_at: now_rfc3339(),
        })
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn opened_at(&self) -> &str {
        &self.opened_at
    }

    /// Close the session. Consumes it: a logged-out session cannot be used.
    pub fn logout(self) {
        info!(username = %self.user.username, "session closed");
    }
}

/// Salted SHA-256 password digest, hex-encoded.
pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_user("amoreau", "Anne", "Moreau", Role::Physician, "s3cret")
            .unwrap();
        db
    }

    #[test]
    fn test_login_with_correct_password() {
        let db = setup_db();

        let session = Session::login(&db, "amoreau", "s3cret").unwrap();
        assert_eq!(session.user().username, "amoreau");
        assert_eq!(session.role(), Role::Physician);
        assert_eq!(session.user().display_name, "Moreau Anne");
    }

    #[test]
    fn test_login_with_wrong_password() {
        let db = setup_db();

        let result = Session::login(&db, "amoreau", "wrong");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_login_with_unknown_user() {
        let db = setup_db();

        let result = Session::login(&db, "nobody", "s3cret");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_hash_depends_on_salt() {
        assert_ne!(hash_password("a", "pw"), hash_password("b", "pw"));
        assert_eq!(hash_password("a", "pw"), hash_password("a", "pw"));
    }

    #[test]
    fn test_session_carries_no_credentials() {
        let db = setup_db();
        let session = Session::login(&db, "amoreau", "s3cret").unwrap();

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));
    }
}
