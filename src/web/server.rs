//! Router assembly and the HTTP listener.

use super::{AppState, analytics, auth, documents, notes, projects, tasks};
use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let timeout = TimeoutLayer::new(state.request_timeout);
    let sessions = state.sessions.clone();

    Router::new()
        // Public pages
        .route("/", get(auth::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/api/health", get(health))
        // Gated pages
        .route("/dashboard", get(auth::dashboard))
        .route("/overview", get(auth::dashboard))
        .route("/analytics", get(analytics::page))
        .route(
            "/documents",
            get(documents::list).post(documents::upload),
        )
        // Tasks
        .route("/api/tasks", get(tasks::api_list).post(tasks::api_create))
        .route("/tasks", get(tasks::view))
        .route("/view-tasks", get(tasks::view))
        .route("/createtasks", get(tasks::create_page).post(tasks::create))
        .route("/create-task", get(tasks::create_page).post(tasks::create))
        .route("/updatetasks", get(tasks::update_page).post(tasks::update))
        .route("/tasksupdate", get(tasks::update_page).post(tasks::update))
        .route("/deletetasks", post(tasks::delete))
        .route("/tasksdelete", post(tasks::delete))
        // Projects
        .route("/api/projects", get(projects::list))
        .route("/api/projects/create", post(projects::create))
        .route("/api/projects/update", post(projects::update))
        .route("/api/projects/delete", post(projects::delete))
        // Notes
        .route("/api/notes", get(notes::list))
        .route("/api/notes/create", post(notes::create))
        .route("/api/notes/update", post(notes::update))
        .route("/api/notes/delete", post(notes::delete))
        .route("/api/analytics", get(analytics::api_summary))
        .layer(sessions)
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ServerHandle {
    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.join.await {
            error!("Server task failed: {}", e);
        }
    }
}

/// Bind and serve in a background task.
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;

    info!("TaskLift listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        join,
    })
}
