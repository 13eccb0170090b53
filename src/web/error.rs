//! HTTP rendering of [`AppError`].

use crate::error::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_if_internal(err: &AppError) {
    if err.code.is_internal() {
        error!(code = ?err.code, "Request failed: {}", err);
    }
}

/// Plain-text rendering, used for browser callers.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log_if_internal(&self);
        (status_of(&self), self.message).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: crate::error::ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

/// An error bound for a JSON caller.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        log_if_internal(&err);
        let body = ErrorBody {
            error: &err.message,
            code: err.code,
            field: err.field.as_deref(),
        };
        (status_of(&err), Json(body)).into_response()
    }
}

/// An error whose rendering depends on how the caller was negotiated.
#[derive(Debug)]
pub struct WebError {
    pub error: AppError,
    pub json: bool,
}

impl WebError {
    pub fn new(error: impl Into<AppError>, json: bool) -> Self {
        Self {
            error: error.into(),
            json,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.json {
            ApiError(self.error).into_response()
        } else {
            self.error.into_response()
        }
    }
}

/// Attach a response format to fallible results.
pub trait ResultExt<T> {
    fn respond_as(self, json: bool) -> Result<T, WebError>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn respond_as(self, json: bool) -> Result<T, WebError> {
        self.map_err(|e| WebError::new(e, json))
    }
}
