use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the fixed role catalog (USER, ADMIN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    pub const USER: &'static str = "USER";
    pub const ADMIN: &'static str = "ADMIN";
}
