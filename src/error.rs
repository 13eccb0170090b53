//! Structured error type shared by the store, the authenticator and the HTTP layer.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    MissingRequiredField,
    InvalidFieldValue,

    // Authentication errors (401)
    Unauthenticated,
    InvalidCredentials,

    // Conflict errors (409)
    AlreadyExists,

    // Unsupported operations (501)
    NotImplemented,

    // Internal errors (500)
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status code this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::MissingRequiredField | ErrorCode::InvalidFieldValue => 400,
            ErrorCode::Unauthenticated | ErrorCode::InvalidCredentials => 401,
            ErrorCode::AlreadyExists => 409,
            ErrorCode::NotImplemented => 501,
            ErrorCode::DatabaseError | ErrorCode::InternalError => 500,
        }
    }

    /// True for failures whose detail must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::DatabaseError | ErrorCode::InternalError)
    }
}

/// Application error. `message` is safe to show to a client; `details` is only logged.
#[derive(Debug, Serialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip)]
    pub details: Option<String>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, "Unauthorized")
    }

    /// Same message whether the account is unknown or the password is wrong.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidCredentials,
            "Invalid username or password",
        )
    }

    pub fn already_exists(what: &str) -> Self {
        Self::new(ErrorCode::AlreadyExists, format!("{} already exists", what))
    }

    pub fn not_implemented(what: &str) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            format!("{} not yet implemented", what),
        )
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, "Internal server error").with_details(err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error").with_details(err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::database(err)
    }
}

// The store returns anyhow errors; validation failures travel inside them as AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<AppError>() {
            Ok(app_err) => return app_err,
            Err(err) => err,
        };
        match err.downcast::<rusqlite::Error>() {
            Ok(db_err) => AppError::database(db_err),
            Err(err) => AppError::internal(err),
        }
    }
}

/// Result type for application operations.
pub type AppResult<T> = std::result::Result<T, AppError>;
