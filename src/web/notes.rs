//! Note JSON endpoints.

use super::error::ApiError;
use super::forms::{FormBody, IdForm, NoteForm, parse_id};
use super::gate::CurrentUser;
use super::{AppState, StatusResponse};
use crate::types::Note;
use axum::{
    Json,
    extract::State,
};
use tracing::debug;

pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.db.list_notes(user.id)?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<NoteForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let note_id = state.db.create_note(user.id, form.to_fields())?;
    debug!(user_id = %user.id, note_id, "Created note");
    Ok(Json(StatusResponse::CREATED))
}

pub(super) async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<NoteForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let note_id = parse_id(form.id.as_deref())?;
    let changed = state.db.update_note(user.id, note_id, form.to_fields())?;
    debug!(user_id = %user.id, note_id, changed, "Update note");
    Ok(Json(StatusResponse::UPDATED))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    FormBody(form): FormBody<IdForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let note_id = parse_id(form.id.as_deref())?;
    let removed = state.db.delete_note(user.id, note_id)?;
    debug!(user_id = %user.id, note_id, removed, "Delete note");
    Ok(Json(StatusResponse::DELETED))
}
