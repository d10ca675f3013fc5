//! User account database operations, including the physician directory.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Physician, Role, User};
use crate::session::hash_password;

impl Database {
    /// Create a user account with a freshly salted password digest,
    /// returning the stored row.
    pub fn create_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
        password: &str,
    ) -> DbResult<User> {
        let salt = uuid::Uuid::new_v4().to_string();
        let digest = hash_password(&salt, password);

        self.conn.execute(
            r#"
            INSERT INTO users (
                username, first_name, last_name, role, password_hash, password_salt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![username, first_name, last_name, role.as_str(), digest, salt],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| DbError::NotFound(format!("user {}", id)))
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT id, username, first_name, last_name, role,
                       password_hash, password_salt, created_at, updated_at
                FROM users
                WHERE id = ?
                "#,
                [id],
                map_user_row,
            )
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    /// Get a user by login name.
    pub fn get_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT id, username, first_name, last_name, role,
                       password_hash, password_salt, created_at, updated_at
                FROM users
                WHERE username = ?
                "#,
                [username],
                map_user_row,
            )
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    /// List all user accounts.
    pub fn list_users(&self) -> DbResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, username, first_name, last_name, role,
                   password_hash, password_salt, created_at, updated_at
            FROM users
            ORDER BY last_name, first_name
            "#,
        )?;

        let rows = stmt.query_map([], map_user_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    /// The physician directory: users with the physician role, as the
    /// reduced shape selection controls consume.
    pub fn list_physicians(&self) -> DbResult<Vec<Physician>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, last_name
            FROM users
            WHERE role = 'physician'
            ORDER BY last_name, first_name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Physician {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Reset a user's password with a fresh salt.
    pub fn set_user_password(&self, id: i64, password: &str) -> DbResult<bool> {
        let salt = uuid::Uuid::new_v4().to_string();
        let digest = hash_password(&salt, password);

        let rows_affected = self.conn.execute(
            r#"
            UPDATE users SET
                password_hash = ?2,
                password_salt = ?3,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![id, digest, salt],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a user account.
    pub fn delete_user(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM users WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    role: String,
    password_hash: String,
    password_salt: String,
    created_at: String,
    updated_at: String,
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: row.get(4)?,
        password_hash: row.get(5)?,
        password_salt: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| DbError::Constraint(format!("Unknown role: {}", row.role)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            password_hash: row.password_hash,
            password_salt: row.password_salt,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
