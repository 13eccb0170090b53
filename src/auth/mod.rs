//! Registration, login and session resolution.
//!
//! Sessions are managed by `tower-sessions` over [`SqliteSessionStore`].
//! The cookie carries only the random session id; the record holds the
//! user id and a fixed expiry set at login.

pub mod password;
pub mod store;

pub use store::SqliteSessionStore;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::types::{User, UserId};
use password::{PasswordError, hash_password, verify_password};
use std::sync::{Arc, OnceLock};
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, Session};
use tracing::{debug, info, warn};

/// Session key holding the authenticated user's id.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::internal(err)
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::internal(err)
    }
}

// Verified against when the account is unknown, so both failure paths cost the same.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("tasklift-dummy-password").ok())
        .as_deref()
}

/// Argon2 work is CPU-bound; keep it off the async workers.
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(AppError::internal)
}

/// Verifies credentials and binds users to sessions.
#[derive(Clone)]
pub struct Authenticator {
    db: Arc<Database>,
    sessions: SqliteSessionStore,
    session_ttl: Duration,
}

impl Authenticator {
    pub fn new(db: Arc<Database>, session_ttl: Duration) -> Self {
        Self {
            sessions: SqliteSessionStore::new(Arc::clone(&db)),
            db,
            session_ttl,
        }
    }

    pub fn session_store(&self) -> &SqliteSessionStore {
        &self.sessions
    }

    /// Register a user. All fields are required and the confirmation must match.
    pub async fn register(&self, reg: &Registration) -> AppResult<UserId> {
        for (field, value) in [
            ("username", &reg.username),
            ("email", &reg.email),
            ("password", &reg.password),
            ("confirmPassword", &reg.confirm_password),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::missing_field(field));
            }
        }
        if reg.password != reg.confirm_password {
            return Err(AppError::invalid_value(
                "confirmPassword",
                "Passwords do not match",
            ));
        }

        let password = reg.password.clone();
        let hash = blocking(move || hash_password(&password)).await??;
        let user_id = self
            .db
            .create_user(reg.username.trim(), Some(reg.email.trim()), &hash)?;
        info!(user_id = %user_id, username = %reg.username.trim(), "Registered user");
        Ok(user_id)
    }

    /// Verify credentials and bind the user to `session` with a fresh id.
    ///
    /// Unknown accounts and wrong passwords fail identically.
    pub async fn login(
        &self,
        session: &Session,
        identifier: &str,
        password: &str,
    ) -> AppResult<UserId> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::missing_field("usernameorEmail"));
        }
        if password.is_empty() {
            return Err(AppError::missing_field("password"));
        }

        let password = password.to_string();
        let Some(creds) = self.db.find_credentials(identifier)? else {
            blocking(move || {
                if let Some(hash) = dummy_hash() {
                    let _ = verify_password(&password, hash);
                }
            })
            .await?;
            debug!("Login rejected: unknown account");
            return Err(AppError::invalid_credentials());
        };

        let hash = creds.password_hash.clone();
        let verified = match blocking(move || verify_password(&password, &hash)).await? {
            Ok(ok) => ok,
            Err(e) => {
                warn!(user_id = %creds.user_id, "Unusable password hash: {}", e);
                false
            }
        };
        if !verified {
            debug!(user_id = %creds.user_id, "Login rejected: bad password");
            return Err(AppError::invalid_credentials());
        }

        let expires_at = OffsetDateTime::now_utc()
            .checked_add(self.session_ttl)
            .ok_or_else(|| AppError::internal("session expiry is out of range"))?;
        session.cycle_id().await?;
        session.set_expiry(Some(Expiry::AtDateTime(expires_at)));
        session.insert(SESSION_USER_ID_KEY, creds.user_id.0).await?;

        info!(user_id = %creds.user_id, "Session opened");
        Ok(creds.user_id)
    }

    /// Resolve a session to its user with a fresh lookup.
    pub async fn resolve_session(&self, session: &Session) -> AppResult<User> {
        let Some(user_id) = session.get::<i64>(SESSION_USER_ID_KEY).await? else {
            return Err(AppError::unauthenticated());
        };
        self.db
            .get_user(UserId(user_id))?
            .ok_or_else(AppError::unauthenticated)
    }

    /// End a session. Sessions without a stored record are ignored.
    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        let had_session = session.id().is_some();
        session.flush().await?;
        if had_session {
            info!("Session closed");
        }
        Ok(())
    }

    /// Drop expired sessions. Returns how many were removed.
    pub fn purge_expired(&self) -> AppResult<usize> {
        let removed = self.sessions.purge_expired()?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }
}
