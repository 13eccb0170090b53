//! Form payloads and their conversion into typed store inputs.
//!
//! Browsers post every field as a string, so payloads keep them as
//! `Option<String>` and validation happens here before any write.

use super::error::WebError;
use super::negotiate::is_json_caller;
use crate::error::{AppError, AppResult};
use crate::types::{
    NewTask, NoteFields, Priority, ProjectFields, ProjectId, ProjectStatus, TaskUpdate,
};
use axum::extract::{Form, FromRequest, Request, rejection::FormRejection};
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Form extractor where a missing or non-form body reads as an empty form.
///
/// Field validation then reports what is missing, as a 400 rendered for the
/// negotiated caller.
#[derive(Debug)]
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json_caller(req.uri().path(), req.headers());
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(FormRejection::InvalidFormContentType(_)) => Ok(Self(T::default())),
            Err(rejection) => {
                debug!("Rejected form body: {}", rejection);
                Err(WebError::new(
                    AppError::invalid_value("body", "Malformed form body"),
                    json,
                ))
            }
        }
    }
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or("")
}

/// Record id from a form. Required and numeric.
pub fn parse_id(value: Option<&str>) -> AppResult<i64> {
    let raw = trimmed(value);
    if raw.is_empty() {
        return Err(AppError::missing_field("id"));
    }
    raw.parse()
        .map_err(|_| AppError::invalid_value("id", "id must be a number"))
}

pub fn parse_priority(value: Option<&str>) -> AppResult<Priority> {
    Priority::parse(trimmed(value))
        .ok_or_else(|| AppError::invalid_value("priority", "priority must be low, medium or high"))
}

pub fn parse_status(value: Option<&str>) -> AppResult<ProjectStatus> {
    ProjectStatus::parse(trimmed(value)).ok_or_else(|| {
        AppError::invalid_value(
            "status",
            "status must be active, completed, paused or cancelled",
        )
    })
}

/// `YYYY-MM-DD`, or nothing when blank.
pub fn parse_due_date(value: Option<&str>) -> AppResult<Option<String>> {
    let raw = trimmed(value);
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| Some(d.format("%Y-%m-%d").to_string()))
        .map_err(|_| AppError::invalid_value("due_date", "due_date must be YYYY-MM-DD"))
}

/// Blank or `0` means no project.
pub fn parse_project_ref(value: Option<&str>) -> AppResult<Option<ProjectId>> {
    match trimmed(value) {
        "" | "0" => Ok(None),
        raw => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::invalid_value("project_id", "project_id must be a number")),
    }
}

/// Blank means zero.
pub fn parse_team_members(value: Option<&str>) -> AppResult<i64> {
    let raw = trimmed(value);
    if raw.is_empty() {
        return Ok(0);
    }
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(AppError::invalid_value(
            "team_members",
            "team_members must be a non-negative number",
        )),
    }
}

/// HTML checkboxes post `on`; scripts may post `true` or `1`.
pub fn parse_checkbox(value: Option<&str>) -> bool {
    matches!(
        trimmed(value).to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "usernameorEmail")]
    pub username_or_email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskForm {
    pub id: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub project_id: Option<String>,
    pub done: Option<String>,
}

impl TaskForm {
    pub fn to_new_task(&self) -> AppResult<NewTask> {
        Ok(NewTask {
            description: trimmed(self.description.as_deref()).to_string(),
            priority: parse_priority(self.priority.as_deref())?,
            due_date: parse_due_date(self.due_date.as_deref())?,
            project_id: parse_project_ref(self.project_id.as_deref())?,
            done: parse_checkbox(self.done.as_deref()),
        })
    }

    /// An absent `project_id` leaves the link unchanged.
    pub fn to_update(&self) -> AppResult<(i64, TaskUpdate)> {
        let id = parse_id(self.id.as_deref())?;
        let project = self
            .project_id
            .as_deref()
            .map(|p| parse_project_ref(Some(p)))
            .transpose()?;
        Ok((
            id,
            TaskUpdate {
                description: trimmed(self.description.as_deref()).to_string(),
                priority: parse_priority(self.priority.as_deref())?,
                due_date: parse_due_date(self.due_date.as_deref())?,
                done: parse_checkbox(self.done.as_deref()),
                project,
            },
        ))
    }
}

/// JSON body for `POST /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskJson {
    #[serde(default)]
    pub description: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub done: bool,
}

impl TaskJson {
    pub fn to_new_task(&self) -> AppResult<NewTask> {
        Ok(NewTask {
            description: self.description.trim().to_string(),
            priority: parse_priority(self.priority.as_deref())?,
            due_date: parse_due_date(self.due_date.as_deref())?,
            project_id: self.project_id.filter(|id| *id != 0),
            done: self.done,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub team_members: Option<String>,
}

impl ProjectForm {
    pub fn to_fields(&self) -> AppResult<ProjectFields> {
        Ok(ProjectFields {
            name: trimmed(self.name.as_deref()).to_string(),
            description: trimmed(self.description.as_deref()).to_string(),
            status: parse_status(self.status.as_deref())?,
            due_date: parse_due_date(self.due_date.as_deref())?,
            team_members: parse_team_members(self.team_members.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteForm {
    pub fn to_fields(&self) -> NoteFields {
        NoteFields {
            title: trimmed(self.title.as_deref()).to_string(),
            content: self.content.clone().unwrap_or_default(),
        }
    }
}

/// Body of the delete endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct IdForm {
    pub id: Option<String>,
}
