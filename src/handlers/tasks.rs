use axum::extract::{Path, Query, State};
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
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
    pub description: Option<String>,
}

/// GET /api/tasks[?status=name] - the principal's tasks, optionally
/// filtered; 204 when the result is empty, 400 for an unrecognized name
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let service = state.task_service();

    let tasks = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(status) => {
            service
                .list_by_owner_and_status(principal.user_id, status)
                .await?
        }
        None => service.list_by_owner(principal.user_id).await?,
    };

    if tasks.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(json!({ "success": true, "data": tasks })).into_response())
}

/// GET /api/tasks/:id - owner only
pub async fn detail(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let task = state.task_service().get_by_id(id).await?;
    authorize(&principal, Action::AccessTask { owner_id: task.owner_id })?;

    Ok(Json(json!({ "success": true, "data": task })).into_response())
}

/// POST /api/tasks - create in TO-DO for the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Response, ApiError> {
    let task = state
        .task_service()
        .create(&payload.description, principal.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": task })),
    )
        .into_response())
}

/// PATCH /api/tasks/:id - update status and/or description. A DELETED
/// target and any mutation of an already-deleted task come back as 400.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Response, ApiError> {
    let service = state.task_service();
    let mut task = service.get_by_id(id).await?;
    authorize(&principal, Action::AccessTask { owner_id: task.owner_id })?;

    let status = payload.status.as_deref().filter(|s| !s.is_empty());
    let description = payload.description.as_deref().filter(|d| !d.is_empty());

    if status.is_none() && description.is_none() {
        return Err(ApiError::bad_request(
            "nothing to update, provide \"status\" and/or \"description\"",
        ));
    }

    // A blank description must fail before the status mutation runs, so a
    // combined patch never half-applies.
    if let Some(description) = description {
        if description.trim().is_empty() {
            return Err(ApiError::bad_request("description must not be empty"));
        }
    }

    if let Some(status) = status {
        task = service.update_status(&task, status).await?;
    }
    if let Some(description) = description {
        task = service.update_description(&task, description).await?;
    }

    Ok(Json(json!({ "success": true, "data": task })).into_response())
}

/// DELETE /api/tasks/:id - soft delete, owner only
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let service = state.task_service();
    let task = service.get_by_id(id).await?;
    authorize(&principal, Action::AccessTask { owner_id: task.owner_id })?;

    service.mark_deleted(&task).await?;
    Ok(Json(json!({
        "success": true,
        "data": format!("Task with ID {} has been marked as \"DELETED\"", id)
    }))
    .into_response())
}
