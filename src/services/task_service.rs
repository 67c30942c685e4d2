use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::catalog::StatusCatalog;
use crate::database::models::{Status, Task, TaskRow};

use super::ServiceError;

const TASK_COLUMNS: &str =
    "id, description, owner_id, status_id, created_at, updated_at, completed_at, deleted_at, is_deleted";

/// Task lifecycle over the fixed state machine:
/// TO-DO -> IN-PROGRESS -> DONE, with DELETED reachable from any non-deleted
/// state through `mark_deleted` only. Once deleted, a task is terminal:
/// every further mutation (including a second delete) is rejected.
pub struct TaskService {
    pool: SqlitePool,
    statuses: StatusCatalog,
}

impl TaskService {
    pub fn new(pool: SqlitePool, statuses: StatusCatalog) -> Self {
        Self { pool, statuses }
    }

    /// Create a task in TO-DO for the given owner.
    pub async fn create(&self, description: &str, owner_id: i64) -> Result<Task, ServiceError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "description must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks (description, owner_id, status_id, created_at, updated_at, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        )
        .bind(description)
        .bind(owner_id)
        .bind(Status::TO_DO)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let task_id = result.last_insert_rowid();
        info!("created task {} for user {}", task_id, owner_id);
        self.get_by_id(task_id).await
    }

    /// Fetch by id. Soft-deleted tasks are still returned here; only the
    /// listings exclude them.
    pub async fn get_by_id(&self, id: i64) -> Result<Task, ServiceError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("task with id {} not found", id)))?;

        self.with_status(row)
    }

    /// All tasks that have not been soft-deleted.
    pub async fn list_active(&self) -> Result<Vec<Task>, ServiceError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE is_deleted = 0 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|row| self.with_status(row)).collect()
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, ServiceError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1 AND is_deleted = 0 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|row| self.with_status(row)).collect()
    }

    pub async fn list_by_status(&self, status_name: &str) -> Result<Vec<Task>, ServiceError> {
        let status = self.resolve_filter_status(status_name)?;
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status_id = ?1 ORDER BY id"
        ))
        .bind(status.id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|row| self.with_status(row)).collect()
    }

    pub async fn list_by_owner_and_status(
        &self,
        owner_id: i64,
        status_name: &str,
    ) -> Result<Vec<Task>, ServiceError> {
        let status = self.resolve_filter_status(status_name)?;
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1 AND status_id = ?2 ORDER BY id"
        ))
        .bind(owner_id)
        .bind(status.id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|row| self.with_status(row)).collect()
    }

    /// Move a task to a new status by name. DELETED is not a legal target
    /// here; it is reachable only through `mark_deleted`. Reaching DONE
    /// stamps `completed_at` (re-stamped on repeat DONE, never cleared by
    /// later transitions).
    pub async fn update_status(&self, task: &Task, status_name: &str) -> Result<Task, ServiceError> {
        self.ensure_mutable(task)?;

        let status = self.statuses.find_by_name(status_name).ok_or_else(|| {
            ServiceError::InvalidArgument(format!("status \"{}\" is not valid", status_name))
        })?;
        if status.id == Status::DELETED {
            return Err(ServiceError::InvalidArgument(
                "tasks cannot be moved to DELETED through a status update, use the delete operation"
                    .to_string(),
            ));
        }

        let now = Utc::now();
        if status.id == Status::DONE {
            sqlx::query(
                "UPDATE tasks SET status_id = ?1, completed_at = ?2, updated_at = ?3 WHERE id = ?4",
            )
            .bind(status.id)
            .bind(now)
            .bind(now)
            .bind(task.id)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query("UPDATE tasks SET status_id = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(status.id)
                .bind(now)
                .bind(task.id)
                .execute(&self.pool)
                .await?;
        }

        info!("task {} moved to {}", task.id, status.name);
        self.get_by_id(task.id).await
    }

    pub async fn update_description(
        &self,
        task: &Task,
        description: &str,
    ) -> Result<Task, ServiceError> {
        self.ensure_mutable(task)?;

        let description = description.trim();
        if description.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "description must not be empty".to_string(),
            ));
        }

        sqlx::query("UPDATE tasks SET description = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(description)
            .bind(Utc::now())
            .bind(task.id)
            .execute(&self.pool)
            .await?;

        self.get_by_id(task.id).await
    }

    /// Soft delete: status DELETED, `is_deleted` set, `deleted_at` stamped.
    /// Terminal; deleting an already-deleted task is rejected.
    pub async fn mark_deleted(&self, task: &Task) -> Result<Task, ServiceError> {
        self.ensure_mutable(task)?;

        let now = Utc::now();
        sqlx::query(
            "UPDATE tasks SET status_id = ?1, is_deleted = 1, deleted_at = ?2, updated_at = ?3
             WHERE id = ?4",
        )
        .bind(Status::DELETED)
        .bind(now)
        .bind(now)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        info!("task {} has been marked as DELETED", task.id);
        self.get_by_id(task.id).await
    }

    fn ensure_mutable(&self, task: &Task) -> Result<(), ServiceError> {
        if task.is_deleted {
            return Err(ServiceError::InvalidArgument(format!(
                "task with id {} has been deleted and can no longer be modified",
                task.id
            )));
        }
        Ok(())
    }

    fn resolve_filter_status(&self, status_name: &str) -> Result<Status, ServiceError> {
        if !self.statuses.is_valid(status_name) {
            return Err(ServiceError::InvalidArgument(format!(
                "status \"{}\" is not valid",
                status_name
            )));
        }
        self.statuses.find_by_name(status_name).ok_or_else(|| {
            ServiceError::InvalidArgument(format!("status \"{}\" is not valid", status_name))
        })
    }

    fn with_status(&self, row: TaskRow) -> Result<Task, ServiceError> {
        let status = self.statuses.find_by_id(row.status_id).ok_or_else(|| {
            ServiceError::NotFound(format!("status with id {} not found", row.status_id))
        })?;
        Ok(Task::from_row(row, status))
    }
}
