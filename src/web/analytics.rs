//! Analytics counters as JSON or as a page.

use super::AppState;
use super::error::{ApiError, ResultExt, WebError};
use super::gate::CurrentUser;
use super::negotiate::wants_json;
use super::templates::{self, ANALYTICS_TEMPLATE};
use crate::types::AnalyticsSummary;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
};

pub(super) async fn api_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    Ok(Json(state.db.analytics_summary(user.id)?))
}

pub(super) async fn page(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let json = wants_json(uri.path(), &headers);
    let summary = state.db.analytics_summary(user.id).respond_as(json)?;
    if json {
        return Ok(Json(summary).into_response());
    }
    Ok(Html(render_summary(&summary)).into_response())
}

fn render_summary(s: &AnalyticsSummary) -> String {
    let counters = [
        ("total_tasks", s.total_tasks.to_string()),
        ("completed_tasks", s.completed_tasks.to_string()),
        ("pending_tasks", s.pending_tasks.to_string()),
        ("high_priority_tasks", s.high_priority_tasks.to_string()),
        ("total_projects", s.total_projects.to_string()),
        ("active_projects", s.active_projects.to_string()),
        ("total_notes", s.total_notes.to_string()),
        ("completion_rate", format!("{:.1}", s.completion_rate)),
    ];
    let values: Vec<(&str, &str)> = counters.iter().map(|(k, v)| (*k, v.as_str())).collect();
    templates::render(ANALYTICS_TEMPLATE, &values)
}
