//! Login, registration and logout.

use super::AppState;
use super::error::{ResultExt, WebError};
use super::forms::{FormBody, LoginForm, RegisterForm};
use super::gate::CurrentUser;
use super::negotiate::is_json_caller;
use super::templates::{self, DASHBOARD_TEMPLATE, HOME_TEMPLATE, LOGIN_TEMPLATE, REGISTER_TEMPLATE};
use crate::auth::Registration;
use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{Html, Redirect},
};
use tower_sessions::Session;
use tracing::warn;

pub(super) async fn home() -> Html<&'static str> {
    Html(HOME_TEMPLATE)
}

pub(super) async fn login_page() -> Html<&'static str> {
    Html(LOGIN_TEMPLATE)
}

pub(super) async fn register_page() -> Html<&'static str> {
    Html(REGISTER_TEMPLATE)
}

/// The session layer writes the cookie once the user is bound to the session.
pub(super) async fn login(
    State(state): State<AppState>,
    session: Session,
    uri: Uri,
    headers: HeaderMap,
    FormBody(form): FormBody<LoginForm>,
) -> Result<Redirect, WebError> {
    let json = is_json_caller(uri.path(), &headers);
    state
        .auth
        .login(
            &session,
            form.username_or_email.as_deref().unwrap_or_default(),
            form.password.as_deref().unwrap_or_default(),
        )
        .await
        .respond_as(json)?;
    Ok(Redirect::to("/dashboard"))
}

pub(super) async fn register(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    FormBody(form): FormBody<RegisterForm>,
) -> Result<Redirect, WebError> {
    let json = is_json_caller(uri.path(), &headers);
    let registration = Registration {
        username: form.username.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        confirm_password: form.confirm_password.unwrap_or_default(),
    };
    state.auth.register(&registration).await.respond_as(json)?;
    Ok(Redirect::to("/login"))
}

/// Flushing the session makes the session layer expire the cookie.
pub(super) async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Err(e) = state.auth.logout(&session).await {
        warn!("Failed to delete session: {}", e);
    }
    Redirect::to("/login")
}

pub(super) async fn dashboard(user: CurrentUser) -> Html<String> {
    Html(templates::render(
        DASHBOARD_TEMPLATE,
        &[("username", user.username.as_str())],
    ))
}
