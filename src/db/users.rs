//! Credential store: user records and their password hashes.

use super::{Database, is_unique_violation, now_timestamp};
use crate::error::AppError;
use crate::types::{User, UserId};
use anyhow::Result;
use rusqlite::{OptionalExtension, Row, params};

/// Stored credential for a user, only used while verifying a login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub username: String,
    pub password_hash: String,
}

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get("id")?),
        username: row.get("username")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

impl Database {
    /// Insert a user. The caller hashes the password; plaintext never reaches this layer.
    ///
    /// Fails with `AlreadyExists` when the username or email is taken.
    pub fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<UserId> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![username, email, password_hash, now],
            );
            match inserted {
                Ok(_) => Ok(UserId(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => {
                    Err(AppError::already_exists("Username or email").into())
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Look up a credential by username or email.
    pub fn find_credentials(&self, identifier: &str) -> Result<Option<Credentials>> {
        self.with_conn(|conn| {
            let creds = conn
                .query_row(
                    "SELECT id, username, password_hash FROM users
                     WHERE username = ?1 OR email = ?1
                     ORDER BY CASE WHEN username = ?1 THEN 0 ELSE 1 END
                     LIMIT 1",
                    params![identifier],
                    |row| {
                        Ok(Credentials {
                            user_id: UserId(row.get(0)?),
                            username: row.get(1)?,
                            password_hash: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(creds)
        })
    }

    /// Fetch a user by id.
    pub fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, email, created_at FROM users WHERE id = ?1",
                    params![user_id.0],
                    parse_user_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    /// Number of registered users.
    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
    }
}
