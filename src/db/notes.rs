//! Owner-scoped note CRUD.

use super::{Database, now_timestamp};
use crate::error::AppError;
use crate::types::{Note, NoteFields, NoteId, UserId};
use anyhow::Result;
use rusqlite::{OptionalExtension, Row, params};

fn parse_note_row(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        user_id: UserId(row.get("user_id")?),
        title: row.get("title")?,
        content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::missing_field("title").into());
    }
    Ok(())
}

impl Database {
    /// List the owner's notes, most recently edited first.
    pub fn list_notes(&self, owner: UserId) -> Result<Vec<Note>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, content, created_at, updated_at
                 FROM notes
                 WHERE user_id = ?1
                 ORDER BY updated_at DESC, id DESC",
            )?;
            let notes = stmt
                .query_map(params![owner.0], parse_note_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(notes)
        })
    }

    pub fn get_note(&self, owner: UserId, note_id: NoteId) -> Result<Option<Note>> {
        self.with_conn(|conn| {
            let note = conn
                .query_row(
                    "SELECT id, user_id, title, content, created_at, updated_at
                     FROM notes WHERE id = ?1 AND user_id = ?2",
                    params![note_id, owner.0],
                    parse_note_row,
                )
                .optional()?;
            Ok(note)
        })
    }

    pub fn create_note(&self, owner: UserId, fields: NoteFields) -> Result<NoteId> {
        require_title(&fields.title)?;
        let now = now_timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (user_id, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![owner.0, fields.title.trim(), fields.content, now, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Returns false when no row of the owner's matched.
    pub fn update_note(&self, owner: UserId, note_id: NoteId, fields: NoteFields) -> Result<bool> {
        require_title(&fields.title)?;
        let now = now_timestamp();
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3
                 WHERE id = ?4 AND user_id = ?5",
                params![fields.title.trim(), fields.content, now, note_id, owner.0],
            )?;
            Ok(n > 0)
        })
    }

    pub fn delete_note(&self, owner: UserId, note_id: NoteId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
                params![note_id, owner.0],
            )?;
            Ok(n > 0)
        })
    }
}
