//! In-memory lookups over the seeded status and role catalogs.
//!
//! Both sets are fixed reference data: four statuses, two roles. They are
//! loaded once at startup and handed around through app state as cheap
//! `Arc`-backed clones, so no request ever goes back to the database for a
//! catalog lookup. Name matching is case-insensitive (input is upper-cased
//! before comparison, matching how the names are stored).

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::database::models::{Role, Status};

#[derive(Debug, Clone)]
pub struct StatusCatalog {
    entries: Arc<Vec<Status>>,
}

impl StatusCatalog {
    pub fn new(entries: Vec<Status>) -> Self {
        Self { entries: Arc::new(entries) }
    }

    /// Load the seeded catalog. Called once during startup.
    pub async fn load(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let entries = sqlx::query_as::<_, Status>("SELECT id, name FROM statuses ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(Self::new(entries))
    }

    pub fn find_by_name(&self, name: &str) -> Option<Status> {
        let name = name.to_uppercase();
        self.entries.iter().find(|s| s.name == name).cloned()
    }

    pub fn find_by_id(&self, id: i64) -> Option<Status> {
        self.entries.iter().find(|s| s.id == id).cloned()
    }

    /// Pre-check used before filtering tasks by status name, so that an
    /// unrecognized name is a validation error rather than an empty result.
    pub fn is_valid(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct RoleCatalog {
    entries: Arc<Vec<Role>>,
}

impl RoleCatalog {
    pub fn new(entries: Vec<Role>) -> Self {
        Self { entries: Arc::new(entries) }
    }

    pub async fn load(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let entries = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(Self::new(entries))
    }

    pub fn find_by_name(&self, name: &str) -> Option<Role> {
        let name = name.to_uppercase();
        self.entries.iter().find(|r| r.name == name).cloned()
    }

    pub fn find_by_id(&self, id: i64) -> Option<Role> {
        self.entries.iter().find(|r| r.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> StatusCatalog {
        StatusCatalog::new(vec![
            Status { id: Status::TO_DO, name: "TO-DO".into() },
            Status { id: Status::IN_PROGRESS, name: "IN-PROGRESS".into() },
            Status { id: Status::DONE, name: "DONE".into() },
            Status { id: Status::DELETED, name: "DELETED".into() },
        ])
    }

    #[test]
    fn lookup_by_name_is_case_insensitive() {
        let catalog = statuses();
        assert_eq!(catalog.find_by_name("to-do").map(|s| s.id), Some(Status::TO_DO));
        assert_eq!(catalog.find_by_name("Done").map(|s| s.id), Some(Status::DONE));
        assert_eq!(
            catalog.find_by_name("IN-PROGRESS").map(|s| s.id),
            Some(Status::IN_PROGRESS)
        );
        assert_eq!(catalog.find_by_name("DELETED").map(|s| s.id), Some(Status::DELETED));
    }

    #[test]
    fn unknown_names_are_invalid() {
        let catalog = statuses();
        assert!(catalog.is_valid("in-progress"));
        assert!(!catalog.is_valid("bogus"));
        assert!(catalog.find_by_name("bogus").is_none());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = statuses();
        assert_eq!(
            catalog.find_by_id(Status::IN_PROGRESS).map(|s| s.name),
            Some("IN-PROGRESS".to_string())
        );
        assert!(catalog.find_by_id(99).is_none());
    }

    #[test]
    fn role_lookup_uppercases_input() {
        let catalog = RoleCatalog::new(vec![
            Role { id: 1, name: "USER".into() },
            Role { id: 2, name: "ADMIN".into() },
        ]);
        assert_eq!(catalog.find_by_name("admin").map(|r| r.id), Some(2));
        assert!(catalog.find_by_name("superuser").is_none());
    }
}
