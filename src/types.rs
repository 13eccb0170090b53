//! Core types for TaskLift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an authenticated user. Every owned row is scoped by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type TaskId = i64;
pub type ProjectId = i64;
pub type NoteId = i64;
pub type DocumentId = i64;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse user input. Blank input yields the default; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Read a stored value, falling back to medium for blank or legacy values.
    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Parse user input. Blank input yields `active`; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            "paused" => Some(ProjectStatus::Paused),
            "cancelled" | "canceled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user. The password hash never leaves the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub created_at: String,
}

/// A task, with the owning project's name joined in at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub description: String,
    pub priority: Priority,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Empty when the task is not linked to a project.
    pub project_name: String,
}

/// A project. `progress`, `task_count` and `completed_tasks` are derived on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub team_members: i64,
    pub task_count: i64,
    pub completed_tasks: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Document metadata. Uploads are not supported, so rows only arrive from outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub user_id: UserId,
    pub title: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub created_at: String,
}

/// Fields for a new task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub project_id: Option<ProjectId>,
    pub done: bool,
}

/// Replacement fields for an existing task.
///
/// `project` is `None` to leave the link untouched, `Some(None)` to clear it.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub done: bool,
    pub project: Option<Option<ProjectId>>,
}

/// Fields for creating or replacing a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub due_date: Option<String>,
    pub team_members: i64,
}

/// Fields for creating or replacing a note.
#[derive(Debug, Clone, Default)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

/// Per-user counters for the analytics view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub high_priority_tasks: i64,
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_notes: i64,
    pub completion_rate: f64,
}

/// Percentage of completed tasks, floored. Zero when there are no tasks.
pub fn project_progress(completed: i64, total: i64) -> i64 {
    if total > 0 { completed * 100 / total } else { 0 }
}

/// Completion rate in percent. Exactly 0.0 when there are no tasks.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_blank_defaults_to_medium() {
        assert_eq!(Priority::parse(""), Some(Priority::Medium));
        assert_eq!(Priority::parse("  "), Some(Priority::Medium));
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::from_stored("urgent"), Priority::Medium);
    }

    #[test]
    fn status_blank_defaults_to_active() {
        assert_eq!(ProjectStatus::parse(""), Some(ProjectStatus::Active));
        assert_eq!(ProjectStatus::parse("paused"), Some(ProjectStatus::Paused));
        assert_eq!(ProjectStatus::parse("archived"), None);
    }

    #[test]
    fn progress_is_floored_percentage() {
        assert_eq!(project_progress(3, 4), 75);
        assert_eq!(project_progress(1, 3), 33);
        assert_eq!(project_progress(0, 0), 0);
        assert_eq!(project_progress(2, 2), 100);
    }

    #[test]
    fn completion_rate_handles_zero_tasks() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(4, 10), 40.0);
    }

    #[test]
    fn priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
        let json = serde_json::to_string(&ProjectStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
