//! Resolves the acting user for gated routes.

use super::AppState;
use super::error::WebError;
use super::negotiate::{is_api_path, is_json_caller};
use crate::error::{AppError, ErrorCode};
use crate::types::UserId;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

/// Why a gated request was turned away.
#[derive(Debug)]
pub enum AuthRejection {
    /// Browser navigation: send to the login page.
    RedirectToLogin,
    /// API caller: bare 401.
    Unauthorized,
    /// The session store failed; rendered for the negotiated caller.
    Store(WebError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::RedirectToLogin => Redirect::to("/login").into_response(),
            AuthRejection::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            AuthRejection::Store(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path();
        let api = is_api_path(path) || is_json_caller(path, &parts.headers);
        let reject = || {
            if api {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        };

        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Err(AuthRejection::Store(WebError::new(
                AppError::internal("session layer is not installed"),
                api,
            )));
        };

        match state.auth.resolve_session(&session).await {
            Ok(user) => Ok(CurrentUser {
                id: user.id,
                username: user.username,
            }),
            Err(err) if err.code == ErrorCode::Unauthenticated => {
                debug!(path, "Stale or unknown session");
                Err(reject())
            }
            Err(err) => Err(AuthRejection::Store(WebError::new(err, api))),
        }
    }
}
