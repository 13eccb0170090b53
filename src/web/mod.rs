//! HTTP surface: routing, the authorization gate and the page/API handlers.

mod analytics;
mod auth;
mod documents;
pub mod error;
pub mod forms;
pub mod gate;
pub mod negotiate;
mod notes;
mod projects;
mod server;
mod tasks;
pub mod templates;

pub use gate::{AuthRejection, CurrentUser};
pub use server::{ServerHandle, build_router, start_server};

use crate::auth::{Authenticator, SqliteSessionStore};
use crate::config::{Config, MAX_SESSION_TTL_HOURS};
use crate::db::Database;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_sessions::SessionManagerLayer;
use tower_sessions::cookie::SameSite;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
    auth: Authenticator,
    sessions: SessionManagerLayer<SqliteSessionStore>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let ttl_hours = config.session.ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        let auth = Authenticator::new(
            Arc::clone(&db),
            tower_sessions::cookie::time::Duration::hours(ttl_hours),
        );
        // Expiry is set per session at login.
        let sessions = SessionManagerLayer::new(auth.session_store().clone())
            .with_name(config.session.cookie_name.clone())
            .with_path("/")
            .with_http_only(true)
            .with_same_site(SameSite::Lax)
            .with_secure(config.session.secure_cookies);
        Self {
            db,
            auth,
            sessions,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }
}

/// `{"status": ...}` acknowledgement for mutations.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const CREATED: Self = Self { status: "created" };
    pub const UPDATED: Self = Self { status: "updated" };
    pub const DELETED: Self = Self { status: "deleted" };
}
