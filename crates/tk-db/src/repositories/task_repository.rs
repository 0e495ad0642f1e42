//! Task repository.
//!
//! Every query is scoped by `owner_id`; there is no unscoped accessor,
//! so a handler cannot reach another user's tasks even by mistake.

use crate::{DbError, Result as DbErrorResult};

use tk_core::{ErrorLocation, Task, TaskStatus};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const TASK_COLUMNS: &str = r#"
    id, owner_id, title, description, deadline, is_urgent, completed,
    status, created_at, updated_at
"#;

/// Insert payload for a new task. The owner always comes from the
/// authenticated identity.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_urgent: bool,
}

pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_task: &NewTask) -> DbErrorResult<Task> {
        let now = Utc::now();
        let ts = now.timestamp();
        let deadline = new_task.deadline.map(|d| d.timestamp());

        let result = sqlx::query(
            r#"
                INSERT INTO tasks (
                    owner_id, title, description, deadline, is_urgent,
                    completed, status, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, 0, 'pending', ?, ?)
            "#,
        )
        .bind(new_task.owner_id)
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(deadline)
        .bind(new_task.is_urgent)
        .bind(ts)
        .bind(ts)
        .execute(&self.pool)
        .await?;

        Ok(Task {
            id: result.last_insert_rowid(),
            owner_id: new_task.owner_id,
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            deadline: new_task.deadline,
            is_urgent: new_task.is_urgent,
            completed: false,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id_for_owner(
        &self,
        id: i64,
        owner_id: i64,
    ) -> DbErrorResult<Option<Task>> {
        let row = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_task(&r)).transpose()
    }

    /// All tasks for a user: incomplete before complete, urgent before
    /// non-urgent, newest first.
    pub async fn find_all_for_owner(&self, owner_id: i64) -> DbErrorResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            r#"
                SELECT {TASK_COLUMNS} FROM tasks
                WHERE owner_id = ?
                ORDER BY completed ASC, is_urgent DESC, created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_task).collect()
    }

    pub async fn find_completed_for_owner(&self, owner_id: i64) -> DbErrorResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            r#"
                SELECT {TASK_COLUMNS} FROM tasks
                WHERE owner_id = ? AND completed = 1
                ORDER BY updated_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_task).collect()
    }

    /// Urgent tasks regardless of completion, incomplete first.
    pub async fn find_urgent_for_owner(&self, owner_id: i64) -> DbErrorResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            r#"
                SELECT {TASK_COLUMNS} FROM tasks
                WHERE owner_id = ? AND is_urgent = 1
                ORDER BY completed ASC, created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_task).collect()
    }

    pub async fn search_for_owner(&self, owner_id: i64, query: &str) -> DbErrorResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            r#"
                SELECT {TASK_COLUMNS} FROM tasks
                WHERE owner_id = ?
                    AND (title LIKE '%' || ? || '%'
                        OR description LIKE '%' || ? || '%')
                ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .bind(query)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_task).collect()
    }

    pub async fn update(&self, task: &Task) -> DbErrorResult<()> {
        let updated_at = task.updated_at.timestamp();
        let deadline = task.deadline.map(|d| d.timestamp());
        let status = task.status.as_str();

        sqlx::query(
            r#"
                UPDATE tasks
                SET title = ?, description = ?, deadline = ?, is_urgent = ?,
                    completed = ?, status = ?, updated_at = ?
                WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(deadline)
        .bind(task.is_urgent)
        .bind(task.completed)
        .bind(status)
        .bind(updated_at)
        .bind(task.id)
        .bind(task.owner_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns false when no row matched (missing or not owned).
    pub async fn delete_for_owner(&self, id: i64, owner_id: i64) -> DbErrorResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Cascade used by the provider `deleted` lifecycle event.
    ///
    /// Takes a `Transaction` so the purge commits atomically with the
    /// owner's anonymization (`UserRepository::soft_delete`).
    pub async fn delete_all_for_user(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        owner_id: i64,
    ) -> DbErrorResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE owner_id = ?")
            .bind(owner_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

fn map_task(row: &SqliteRow) -> DbErrorResult<Task> {
    let status: String = row.try_get("status")?;

    Ok(Task {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        deadline: row
            .try_get::<Option<i64>, _>("deadline")?
            .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        is_urgent: row.try_get("is_urgent")?,
        completed: row.try_get("completed")?,
        status: TaskStatus::from_str(&status).map_err(|e| DbError::Initialization {
            message: format!("Invalid TaskStatus in tasks.status: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?,
        created_at: DateTime::from_timestamp(row.try_get("created_at")?, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in tasks.created_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
        updated_at: DateTime::from_timestamp(row.try_get("updated_at")?, 0).ok_or_else(|| {
            DbError::Initialization {
                message: "Invalid timestamp in tasks.updated_at".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?,
    })
}
