use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - validate credentials, return a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .user_service()
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let token = generate_jwt(Claims::new(&user)).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("failed to issue token")
    })?;

    tracing::info!("user \"{}\" logged in", user.username);
    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": user,
            "expires_in": config::config().security.jwt_expiry_hours * 3600,
        }
    })))
}
