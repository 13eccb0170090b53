//! Document metadata. File storage itself is not handled here.

use super::{Database, now_timestamp};
use crate::error::AppError;
use crate::types::{Document, DocumentId, UserId};
use anyhow::Result;
use rusqlite::{Row, params};

fn parse_document_row(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get("id")?,
        user_id: UserId(row.get("user_id")?),
        title: row.get("title")?,
        file_path: row.get("file_path")?,
        file_type: row.get::<_, Option<String>>("file_type")?.unwrap_or_default(),
        file_size: row.get::<_, Option<i64>>("file_size")?.unwrap_or(0),
        created_at: row.get("created_at")?,
    })
}

impl Database {
    /// List the owner's documents, newest first.
    pub fn list_documents(&self, owner: UserId) -> Result<Vec<Document>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, file_path, file_type, file_size, created_at
                 FROM documents
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let docs = stmt
                .query_map(params![owner.0], parse_document_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(docs)
        })
    }

    /// Record metadata for a file stored elsewhere.
    pub fn record_document(
        &self,
        owner: UserId,
        title: &str,
        file_path: &str,
        file_type: &str,
        file_size: i64,
    ) -> Result<DocumentId> {
        if title.trim().is_empty() {
            return Err(AppError::missing_field("title").into());
        }
        if file_path.trim().is_empty() {
            return Err(AppError::missing_field("file_path").into());
        }
        let now = now_timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (user_id, title, file_path, file_type, file_size, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![owner.0, title.trim(), file_path, file_type, file_size.max(0), now],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }
}
