use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the fixed status catalog. Seeded at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: i64,
    pub name: String,
}

impl Status {
    pub const TO_DO: i64 = 1;
    pub const IN_PROGRESS: i64 = 2;
    pub const DONE: i64 = 3;
    pub const DELETED: i64 = 4;
}
