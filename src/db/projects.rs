//! Owner-scoped project CRUD with read-time progress.

use super::{Database, non_empty, now_timestamp};
use crate::error::AppError;
use crate::types::{Project, ProjectFields, ProjectId, ProjectStatus, UserId, project_progress};
use anyhow::Result;
use rusqlite::{OptionalExtension, Row, params};

// Task counts come from a join, so progress always reflects current task state.
const PROJECT_SELECT: &str = "SELECT p.id, p.user_id, p.name, p.description, p.status, p.due_date,
            p.team_members, p.created_at, p.updated_at,
            COUNT(t.id) AS task_count,
            COUNT(CASE WHEN t.done = 1 THEN 1 END) AS completed_tasks
     FROM projects p
     LEFT JOIN tasks t ON t.project_id = p.id AND t.user_id = p.user_id";

fn parse_project_row(row: &Row) -> rusqlite::Result<Project> {
    let status: Option<String> = row.get("status")?;
    let task_count: i64 = row.get("task_count")?;
    let completed_tasks: i64 = row.get("completed_tasks")?;
    Ok(Project {
        id: row.get("id")?,
        user_id: UserId(row.get("user_id")?),
        name: row.get("name")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        status: ProjectStatus::from_stored(status.as_deref().unwrap_or_default()),
        progress: project_progress(completed_tasks, task_count),
        due_date: non_empty(row.get("due_date")?),
        team_members: row.get::<_, Option<i64>>("team_members")?.unwrap_or(0),
        task_count,
        completed_tasks,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::missing_field("name").into());
    }
    Ok(())
}

impl Database {
    /// List the owner's projects, newest first.
    pub fn list_projects(&self, owner: UserId) -> Result<Vec<Project>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{PROJECT_SELECT}
                 WHERE p.user_id = ?1
                 GROUP BY p.id
                 ORDER BY p.created_at DESC, p.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let projects = stmt
                .query_map(params![owner.0], parse_project_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
    }

    /// Fetch one of the owner's projects.
    pub fn get_project(&self, owner: UserId, project_id: ProjectId) -> Result<Option<Project>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{PROJECT_SELECT}
                 WHERE p.id = ?1 AND p.user_id = ?2
                 GROUP BY p.id"
            );
            let project = conn
                .query_row(&sql, params![project_id, owner.0], parse_project_row)
                .optional()?;
            Ok(project)
        })
    }

    /// Create a project for the owner.
    pub fn create_project(&self, owner: UserId, fields: ProjectFields) -> Result<ProjectId> {
        require_name(&fields.name)?;
        let now = now_timestamp();
        let due_date = non_empty(fields.due_date);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO projects (
                    user_id, name, description, status, due_date, team_members, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    owner.0,
                    fields.name.trim(),
                    fields.description,
                    fields.status.as_str(),
                    due_date,
                    fields.team_members,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Replace a project's fields. Returns false when no row of the owner's matched.
    pub fn update_project(
        &self,
        owner: UserId,
        project_id: ProjectId,
        fields: ProjectFields,
    ) -> Result<bool> {
        require_name(&fields.name)?;
        let now = now_timestamp();
        let due_date = non_empty(fields.due_date);

        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE projects
                 SET name = ?1, description = ?2, status = ?3, due_date = ?4,
                     team_members = ?5, updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8",
                params![
                    fields.name.trim(),
                    fields.description,
                    fields.status.as_str(),
                    due_date,
                    fields.team_members,
                    now,
                    project_id,
                    owner.0,
                ],
            )?;
            Ok(n > 0)
        })
    }

    /// Delete one of the owner's projects.
    ///
    /// Linked tasks are unlinked first and survive; both statements share one
    /// transaction. Deleting a missing project is a no-op.
    pub fn delete_project(&self, owner: UserId, project_id: ProjectId) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let unlinked = tx.execute(
                "UPDATE tasks SET project_id = NULL
                 WHERE project_id = ?1
                   AND EXISTS (SELECT 1 FROM projects WHERE id = ?1 AND user_id = ?2)",
                params![project_id, owner.0],
            )?;

            let deleted = tx.execute(
                "DELETE FROM projects WHERE id = ?1 AND user_id = ?2",
                params![project_id, owner.0],
            )?;

            tx.commit()?;

            if deleted > 0 {
                tracing::debug!(project_id, unlinked, "Deleted project");
            }
            Ok(deleted > 0)
        })
    }
}
