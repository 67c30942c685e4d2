use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub mod auth;
pub mod tasks;
pub mod users;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Task Tracker API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "POST /auth/login (public - token acquisition)",
                "register": "POST /users (public)",
                "tasks": "/api/tasks[/:id] (protected, owner-scoped)",
                "users": "/api/users[/:id] (protected)",
                "roles": "/api/users/:id/roles/{add,remove} (protected, admin)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    crate::database::health_check(&state.pool).await.map_err(|e| {
        tracing::error!("database health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}
