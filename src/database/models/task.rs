use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::status::Status;

/// Raw `tasks` row as stored, with the status as a foreign key.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub description: String,
    pub owner_id: i64,
    pub status_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

/// A task with its status resolved against the catalog, as returned to
/// clients. Invariant: `is_deleted == true` exactly when the status is
/// DELETED and `deleted_at` is set.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub owner_id: i64,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl Task {
    pub fn from_row(row: TaskRow, status: Status) -> Self {
        Self {
            id: row.id,
            description: row.description,
            owner_id: row.owner_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
            deleted_at: row.deleted_at,
            is_deleted: row.is_deleted,
        }
    }

    /// Ownership check used by the access policy.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}
