//! Task pages and endpoints.

use super::error::{ApiError, ResultExt, WebError};
use super::forms::{FormBody, IdForm, TaskForm, TaskJson, parse_id};
use super::gate::CurrentUser;
use super::negotiate::{has_referer, is_json_caller, wants_json};
use super::templates::{self, CREATE_TASK_TEMPLATE, TASKS_TEMPLATE, UPDATE_TASK_TEMPLATE};
use super::{AppState, StatusResponse};
use crate::error::AppError;
use crate::types::Task;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

pub(super) async fn api_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.db.list_tasks(user.id)?))
}

pub(super) async fn api_create(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<TaskJson>, JsonRejection>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected task payload: {}", e);
        AppError::invalid_value("body", "Invalid JSON")
    })?;
    let task_id = state.db.create_task(user.id, payload.to_new_task()?)?;
    debug!(user_id = %user.id, task_id, "Created task");
    Ok((StatusCode::CREATED, Json(StatusResponse::CREATED)))
}

/// JSON when negotiated, otherwise the page that loads the list itself.
pub(super) async fn view(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if wants_json(uri.path(), &headers) {
        let tasks = state.db.list_tasks(user.id).respond_as(true)?;
        return Ok(Json(tasks).into_response());
    }
    Ok(Html(TASKS_TEMPLATE).into_response())
}

pub(super) async fn create_page(_user: CurrentUser) -> Html<&'static str> {
    Html(CREATE_TASK_TEMPLATE)
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
    FormBody(form): FormBody<TaskForm>,
) -> Result<Response, WebError> {
    let json = is_json_caller(uri.path(), &headers);
    let task = form.to_new_task().respond_as(json)?;
    let task_id = state.db.create_task(user.id, task).respond_as(json)?;
    debug!(user_id = %user.id, task_id, "Created task");

    if json {
        Ok(Json(StatusResponse::CREATED).into_response())
    } else {
        Ok(Redirect::to("/tasks").into_response())
    }
}

pub(super) async fn update_page(
    _user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<IdForm>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(query.id.as_deref()).respond_as(wants_json(uri.path(), &headers))?;
    Ok(Html(templates::render(
        UPDATE_TASK_TEMPLATE,
        &[("task_id", id.to_string().as_str())],
    )))
}

/// Script callers and callers without a `Referer` get JSON.
pub(super) async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
    FormBody(form): FormBody<TaskForm>,
) -> Result<Response, WebError> {
    let json = is_json_caller(uri.path(), &headers) || !has_referer(&headers);
    let (task_id, update) = form.to_update().respond_as(json)?;
    let changed = state
        .db
        .update_task(user.id, task_id, update)
        .respond_as(json)?;
    debug!(user_id = %user.id, task_id, changed, "Update task");

    if json {
        Ok(Json(StatusResponse::UPDATED).into_response())
    } else {
        Ok(Redirect::to("/tasks").into_response())
    }
}

pub(super) async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<IdForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let task_id = parse_id(form.id.as_deref())?;
    let removed = state.db.delete_task(user.id, task_id)?;
    debug!(user_id = %user.id, task_id, removed, "Delete task");
    Ok(Json(StatusResponse::DELETED))
}
