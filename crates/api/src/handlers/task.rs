//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tasker_core::error::CoreError;
use tasker_core::task::TaskStatus;
use tasker_core::types::TaskId;
use tasker_db::models::task::{CreateTask, Task, UpdateTask};

use crate::error::{AppError, AppResult};
use crate::extract::{QueryParams, TaskIdPath, ValidatedJson};
use crate::state::AppState;

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    pub status: Option<String>,
}

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub status: &'static str,
}

fn not_found(id: TaskId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> AppResult<Json<Task>> {
    let task = state.tasks().await?.create(&input).await?;
    tracing::info!(task_id = %task.id, "Task created");
    Ok(Json(task))
}

/// GET /tasks?status=
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListTasksParams>,
) -> AppResult<Json<Vec<Task>>> {
    let status = params
        .status
        .as_deref()
        .map(TaskStatus::from_str_value)
        .transpose()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let tasks = state.tasks().await?.list(status).await?;
    Ok(Json(tasks))
}

/// GET /tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
) -> AppResult<Json<Task>> {
    let task = state
        .tasks()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(task))
}

/// PUT /tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> AppResult<Json<Task>> {
    let task = state
        .tasks()
        .await?
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(task))
}

/// DELETE /tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    TaskIdPath(id): TaskIdPath,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = state.tasks().await?.delete(id).await?;
    if deleted {
        tracing::info!(task_id = %id, "Task deleted");
        Ok(Json(DeletedResponse { status: "deleted" }))
    } else {
        Err(not_found(id))
    }
}
