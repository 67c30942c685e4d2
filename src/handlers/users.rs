use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::policy::{authorize, Action};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub current_password: String,
    pub email: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
}

/// POST /users - open registration, 201 with the new account
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .user_service()
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": user })),
    )
        .into_response())
}

/// GET /api/users - admin only, 204 when there is nothing to list
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    authorize(&principal, Action::ListUsers)?;

    let users = state.user_service().list().await?;
    if users.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(json!({ "success": true, "data": users })).into_response())
}

/// GET /api/users/:id - self or admin
pub async fn detail(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    authorize(&principal, Action::ViewUser { target_id: id })?;

    let user = state.user_service().get_by_id(id).await?;
    Ok(Json(json!({ "success": true, "data": user })).into_response())
}

/// PATCH /api/users - update own email/password after re-verifying the
/// current password
pub async fn update_self(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let service = state.user_service();
    let user = service.get_by_id(principal.user_id).await?;

    let updated = service
        .update_self(
            &user,
            &payload.current_password,
            payload.email.as_deref(),
            payload.new_password.as_deref(),
        )
        .await?;

    Ok(Json(json!({ "success": true, "data": updated })).into_response())
}

/// DELETE /api/users/:id - admin only, hard delete
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    authorize(&principal, Action::DeleteUser)?;

    state.user_service().delete(id).await?;
    tracing::info!("user {} deleted by \"{}\"", id, principal.username);
    Ok(Json(json!({
        "success": true,
        "data": format!("User with ID {} has been deleted", id)
    }))
    .into_response())
}

/// PATCH /api/users/:id/roles/add - admin only
pub async fn add_role(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdateRequest>,
) -> Result<Response, ApiError> {
    authorize(&principal, Action::ManageRoles)?;

    let service = state.user_service();
    let user = service.get_by_id(id).await?;
    let updated = service.add_role(&user, &payload.role).await?;

    Ok(Json(json!({ "success": true, "data": updated })).into_response())
}

/// PATCH /api/users/:id/roles/remove - admin only
pub async fn remove_role(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdateRequest>,
) -> Result<Response, ApiError> {
    authorize(&principal, Action::ManageRoles)?;

    let service = state.user_service();
    let user = service.get_by_id(id).await?;
    let updated = service.remove_role(&user, &payload.role).await?;

    Ok(Json(json!({ "success": true, "data": updated })).into_response())
}
