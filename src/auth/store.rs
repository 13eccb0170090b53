//! SQLite session store for `tower-sessions`.

use crate::db::Database;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tower_sessions::SessionStore;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;

/// Persists session records in the `sessions` table.
#[derive(Clone)]
pub struct SqliteSessionStore {
    db: Arc<Database>,
}

impl SqliteSessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Drop expired rows. Returns how many were removed.
    pub fn purge_expired(&self) -> anyhow::Result<usize> {
        self.db
            .purge_expired_sessions(OffsetDateTime::now_utc().unix_timestamp())
    }
}

impl fmt::Debug for SqliteSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSessionStore").finish_non_exhaustive()
    }
}

fn backend(err: anyhow::Error) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

fn encode(record: &Record) -> session_store::Result<String> {
    serde_json::to_string(record).map_err(|e| session_store::Error::Encode(e.to_string()))
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Regenerate the id on collision.
        loop {
            let data = encode(record)?;
            let expires_at = record.expiry_date.unix_timestamp();
            if self
                .db
                .insert_session(&record.id.to_string(), &data, expires_at)
                .map_err(backend)?
            {
                return Ok(());
            }
            record.id = Id::default();
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let data = encode(record)?;
        self.db
            .save_session(
                &record.id.to_string(),
                &data,
                record.expiry_date.unix_timestamp(),
            )
            .map_err(backend)
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let Some(data) = self.db.load_session(&id.to_string(), now).map_err(backend)? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&data)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;
        Ok(Some(record))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.db.delete_session(&id.to_string()).map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tower_sessions::cookie::time::Duration;

    fn record(expiry_date: OffsetDateTime) -> Record {
        let mut data = HashMap::new();
        data.insert("user_id".to_string(), serde_json::json!(7));
        Record {
            id: Id::default(),
            data,
            expiry_date,
        }
    }

    fn store() -> SqliteSessionStore {
        SqliteSessionStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn saved_records_load_back() {
        let store = store();
        let mut rec = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.create(&mut rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, rec.id);
        assert_eq!(loaded.data["user_id"], serde_json::json!(7));

        rec.data.insert("user_id".to_string(), serde_json::json!(8));
        store.save(&rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.data["user_id"], serde_json::json!(8));
    }

    #[tokio::test]
    async fn deleted_and_unknown_ids_load_nothing() {
        let store = store();
        let mut rec = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.create(&mut rec).await.unwrap();
        store.delete(&rec.id).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(store.load(&Id::default()).await.unwrap().is_none());
        // Deleting twice is harmless.
        store.delete(&rec.id).await.unwrap();
    }

    #[tokio::test]
    async fn expired_records_are_hidden_then_purged() {
        let store = store();
        let mut stale = record(OffsetDateTime::now_utc() - Duration::minutes(1));
        let mut live = record(OffsetDateTime::now_utc() + Duration::hours(1));
        store.create(&mut stale).await.unwrap();
        store.create(&mut live).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }
}
