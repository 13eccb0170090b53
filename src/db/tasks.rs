//! Owner-scoped task CRUD.

use super::{Database, non_empty, now_timestamp};
use crate::error::AppError;
use crate::types::{NewTask, Priority, ProjectId, Task, TaskId, TaskUpdate, UserId};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

const TASK_COLUMNS: &str = "t.id, t.user_id, t.project_id, t.description, t.priority, t.done,
     t.due_date, t.created_at, t.updated_at, COALESCE(p.name, '') AS project_name";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: Option<String> = row.get("priority")?;
    Ok(Task {
        id: row.get("id")?,
        user_id: UserId(row.get("user_id")?),
        project_id: row.get("project_id")?,
        description: row.get("description")?,
        priority: Priority::from_stored(priority.as_deref().unwrap_or_default()),
        done: row.get("done")?,
        due_date: non_empty(row.get("due_date")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        project_name: row.get("project_name")?,
    })
}

/// Reject links to projects the owner does not hold.
fn ensure_project_owned(conn: &Connection, owner: UserId, project_id: ProjectId) -> Result<()> {
    let owned = conn
        .query_row(
            "SELECT 1 FROM projects WHERE id = ?1 AND user_id = ?2",
            params![project_id, owner.0],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !owned {
        return Err(AppError::invalid_value("project_id", "Unknown project").into());
    }
    Ok(())
}

fn require_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(AppError::missing_field("description").into());
    }
    Ok(())
}

impl Database {
    /// List the owner's tasks, newest first, with the linked project's name.
    pub fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {TASK_COLUMNS}
                 FROM tasks t
                 LEFT JOIN projects p ON p.id = t.project_id AND p.user_id = t.user_id
                 WHERE t.user_id = ?1
                 ORDER BY t.created_at DESC, t.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map(params![owner.0], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Fetch one of the owner's tasks. Someone else's task reads as absent.
    pub fn get_task(&self, owner: UserId, task_id: TaskId) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {TASK_COLUMNS}
                 FROM tasks t
                 LEFT JOIN projects p ON p.id = t.project_id AND p.user_id = t.user_id
                 WHERE t.id = ?1 AND t.user_id = ?2"
            );
            let task = conn
                .query_row(&sql, params![task_id, owner.0], parse_task_row)
                .optional()?;
            Ok(task)
        })
    }

    /// Create a task for the owner.
    pub fn create_task(&self, owner: UserId, task: NewTask) -> Result<TaskId> {
        require_description(&task.description)?;
        let now = now_timestamp();
        let due_date = non_empty(task.due_date);

        self.with_conn(|conn| {
            if let Some(pid) = task.project_id {
                ensure_project_owned(conn, owner, pid)?;
            }

            conn.execute(
                "INSERT INTO tasks (
                    user_id, project_id, description, priority, done, due_date, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    owner.0,
                    task.project_id,
                    task.description.trim(),
                    task.priority.as_str(),
                    task.done,
                    due_date,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Replace a task's fields. Returns false when no row of the owner's matched.
    pub fn update_task(&self, owner: UserId, task_id: TaskId, update: TaskUpdate) -> Result<bool> {
        require_description(&update.description)?;
        let now = now_timestamp();
        let due_date = non_empty(update.due_date);

        self.with_conn(|conn| {
            let changed = match update.project {
                None => conn.execute(
                    "UPDATE tasks
                     SET description = ?1, priority = ?2, due_date = ?3, done = ?4, updated_at = ?5
                     WHERE id = ?6 AND user_id = ?7",
                    params![
                        update.description.trim(),
                        update.priority.as_str(),
                        due_date,
                        update.done,
                        now,
                        task_id,
                        owner.0,
                    ],
                )?,
                Some(project_id) => {
                    if let Some(pid) = project_id {
                        ensure_project_owned(conn, owner, pid)?;
                    }
                    conn.execute(
                        "UPDATE tasks
                         SET description = ?1, priority = ?2, due_date = ?3, done = ?4,
                             project_id = ?5, updated_at = ?6
                         WHERE id = ?7 AND user_id = ?8",
                        params![
                            update.description.trim(),
                            update.priority.as_str(),
                            due_date,
                            update.done,
                            project_id,
                            now,
                            task_id,
                            owner.0,
                        ],
                    )?
                }
            };
            Ok(changed > 0)
        })
    }

    /// Delete one of the owner's tasks. Deleting a missing task is a no-op.
    pub fn delete_task(&self, owner: UserId, task_id: TaskId) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![task_id, owner.0],
            )?;
            Ok(n > 0)
        })
    }
}
