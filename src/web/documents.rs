//! Document metadata listing. Uploads are not supported.

use super::AppState;
use super::error::{ResultExt, WebError};
use super::gate::CurrentUser;
use super::negotiate::{is_json_caller, wants_json};
use super::templates::DOCUMENTS_TEMPLATE;
use crate::error::AppError;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
};

pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if wants_json(uri.path(), &headers) {
        let documents = state.db.list_documents(user.id).respond_as(true)?;
        return Ok(Json(documents).into_response());
    }
    Ok(Html(DOCUMENTS_TEMPLATE).into_response())
}

pub(super) async fn upload(_user: CurrentUser, uri: Uri, headers: HeaderMap) -> WebError {
    WebError::new(
        AppError::not_implemented("Document upload"),
        is_json_caller(uri.path(), &headers),
    )
}
