//! Project JSON endpoints.

use super::error::ApiError;
use super::forms::{FormBody, IdForm, ProjectForm, parse_id};
use super::gate::CurrentUser;
use super::{AppState, StatusResponse};
use crate::types::Project;
use axum::{
    Json,
    extract::State,
};
use tracing::debug;

pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.db.list_projects(user.id)?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<ProjectForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let project_id = state.db.create_project(user.id, form.to_fields()?)?;
    debug!(user_id = %user.id, project_id, "Created project");
    Ok(Json(StatusResponse::CREATED))
}

pub(super) async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<ProjectForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let project_id = parse_id(form.id.as_deref())?;
    let changed = state
        .db
        .update_project(user.id, project_id, form.to_fields()?)?;
    debug!(user_id = %user.id, project_id, changed, "Update project");
    Ok(Json(StatusResponse::UPDATED))
}

/// Linked tasks survive with their project reference cleared.
pub(super) async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<IdForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let project_id = parse_id(form.id.as_deref())?;
    state.db.delete_project(user.id, project_id)?;
    Ok(Json(StatusResponse::DELETED))
}
