use sqlx::SqlitePool;

use crate::catalog::{RoleCatalog, StatusCatalog};
use crate::database;
use crate::services::{TaskService, UserService};

/// Shared application state: the connection pool plus the immutable
/// status/role catalogs loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub statuses: StatusCatalog,
    pub roles: RoleCatalog,
}

impl AppState {
    /// Create tables, seed the catalogs, and load them into memory.
    pub async fn init(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        database::init_schema(&pool).await?;
        let statuses = StatusCatalog::load(&pool).await?;
        let roles = RoleCatalog::load(&pool).await?;
        Ok(Self { pool, statuses, roles })
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.pool.clone(), self.roles.clone())
    }

    pub fn task_service(&self) -> TaskService {
        TaskService::new(self.pool.clone(), self.statuses.clone())
    }
}
