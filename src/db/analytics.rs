//! Per-user aggregate counters.

use super::Database;
use crate::types::{AnalyticsSummary, UserId, completion_rate};
use anyhow::Result;
use rusqlite::params;

impl Database {
    /// Summarize the owner's tasks, projects and notes. Read-only; zero rows give zeroes.
    pub fn analytics_summary(&self, owner: UserId) -> Result<AnalyticsSummary> {
        self.with_conn(|conn| {
            let (total_tasks, completed_tasks, high_priority_tasks): (i64, i64, i64) = conn
                .query_row(
                    "SELECT
                        COUNT(*),
                        COALESCE(SUM(CASE WHEN done = 1 THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN priority = 'high' THEN 1 ELSE 0 END), 0)
                     FROM tasks WHERE user_id = ?1",
                    params![owner.0],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )?;

            let (total_projects, active_projects): (i64, i64) = conn.query_row(
                "SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0)
                 FROM projects WHERE user_id = ?1",
                params![owner.0],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let total_notes: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE user_id = ?1",
                params![owner.0],
                |row| row.get(0),
            )?;

            Ok(AnalyticsSummary {
                total_tasks,
                completed_tasks,
                pending_tasks: total_tasks - completed_tasks,
                high_priority_tasks,
                total_projects,
                active_projects,
                total_notes,
                completion_rate: completion_rate(completed_tasks, total_tasks),
            })
        })
    }
}
