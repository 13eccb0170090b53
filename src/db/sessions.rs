//! Server-side session rows backing the cookie session layer.
//!
//! Rows hold the serialized session record. `expires_at` is a unix
//! timestamp so expiry checks compare integers.

use super::Database;
use anyhow::Result;
use rusqlite::{OptionalExtension, params};

impl Database {
    /// Insert a new session row. Returns false if the id is already taken.
    pub fn insert_session(&self, id: &str, data: &str, expires_at: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "INSERT INTO sessions (id, data, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                params![id, data, expires_at],
            )?;
            Ok(n == 1)
        })
    }

    /// Insert or replace a session row.
    pub fn save_session(&self, id: &str, data: &str, expires_at: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, data, expires_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET data = excluded.data, expires_at = excluded.expires_at",
                params![id, data, expires_at],
            )?;
            Ok(())
        })
    }

    /// Serialized record of a session still live at `now`.
    pub fn load_session(&self, id: &str, now: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let data = conn
                .query_row(
                    "SELECT data FROM sessions WHERE id = ?1 AND expires_at > ?2",
                    params![id, now],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(data)
        })
    }

    /// Remove a session. Returns whether a row was deleted.
    pub fn delete_session(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
            Ok(n > 0)
        })
    }

    /// Remove every session that expired at or before `now`.
    pub fn purge_expired_sessions(&self, now: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                params![now],
            )?;
            Ok(n)
        })
    }
}
