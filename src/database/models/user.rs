use serde::Serialize;
use sqlx::FromRow;

use super::role::Role;

/// Raw `users` row. The bcrypt hash stays in this struct and in [`User`];
/// neither is ever serialized outward.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// An account record with its roles attached. Every user holds at least
/// one role; the service layer rejects removal of the last one.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn from_row(row: UserRow, roles: Vec<Role>) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            roles,
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }
}
