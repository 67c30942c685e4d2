use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub mod models;

/// Table definitions. Statements run one at a time because the sqlite
/// driver prepares a single statement per query.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS statuses (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS roles (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email    TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS user_roles (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        role_id INTEGER NOT NULL REFERENCES roles(id),
        PRIMARY KEY (user_id, role_id)
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        description  TEXT NOT NULL,
        owner_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        status_id    INTEGER NOT NULL REFERENCES statuses(id),
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL,
        completed_at TEXT,
        deleted_at   TEXT,
        is_deleted   INTEGER NOT NULL DEFAULT 0
    )",
];

/// Fixed catalogs, seeded once. `OR IGNORE` keeps restarts idempotent.
const SEED: &[&str] = &[
    "INSERT OR IGNORE INTO statuses (id, name) VALUES
        (1, 'TO-DO'), (2, 'IN-PROGRESS'), (3, 'DONE'), (4, 'DELETED')",
    "INSERT OR IGNORE INTO roles (id, name) VALUES
        (1, 'USER'), (2, 'ADMIN')",
];

/// Open a pool against the given sqlite URL, creating the file if needed.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    info!("opened database pool for {}", url);
    Ok(pool)
}

/// Create tables and seed the status/role catalogs.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for stmt in SCHEMA.iter().chain(SEED) {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}

/// Pings the store to confirm connectivity.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
