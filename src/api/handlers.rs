use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::AppError;
use crate::api::extract::{AppJson, AppPath, AppQuery};
use crate::model::{Id, NewTask, Task, TaskFilter, TaskPatch};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

pub async fn get_all_tasks<S: Store>(
    State(store): State<AppState<S>>,
    AppQuery(filter): AppQuery<TaskFilter>,
) -> Result<Json<TaskListResponse>, AppError> {
    let tasks = store.list_tasks(filter).await?;
    Ok(Json(TaskListResponse { tasks }))
}

pub async fn create_task<S: Store>(
    State(store): State<AppState<S>>,
    AppJson(new_task): AppJson<NewTask>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = store.create_task(new_task).await?;
    log::info!("Created task {}", task.id);
    Ok(Json(TaskResponse { task }))
}

pub async fn get_task<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(task_id): AppPath<Id>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = store
        .get_task(&task_id)
        .await?
        .ok_or_else(|| AppError::task_not_found(&task_id))?;
    Ok(Json(TaskResponse { task }))
}

pub async fn update_task<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(task_id): AppPath<Id>,
    AppJson(patch): AppJson<TaskPatch>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = store
        .update_task(&task_id, patch)
        .await?
        .ok_or_else(|| AppError::task_not_found(&task_id))?;
    Ok(Json(TaskResponse { task }))
}

pub async fn delete_task<S: Store>(
    State(store): State<AppState<S>>,
    AppPath(task_id): AppPath<Id>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = store
        .delete_task(&task_id)
        .await?
        .ok_or_else(|| AppError::task_not_found(&task_id))?;
    log::info!("Deleted task {}", task.id);
    Ok(Json(TaskResponse { task }))
}
