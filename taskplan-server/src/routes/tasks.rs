//! Task endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use taskplan_core::{NewTask, Task, TaskList};

use crate::routes::{ApiJson, ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/today", get(today_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/done", post(mark_task_done))
}

/// Query for a range listing; missing dates use the default window
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /tasks/today
async fn today_tasks(State(state): State<AppState>) -> Result<Json<TaskList>, AppError> {
    let today = Local::now().date_naive();
    Ok(Json(state.tasks().tasks_for_day(today).await?))
}

/// GET /tasks?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<RangeQuery>,
) -> Result<Json<TaskList>, AppError> {
    let tasks = state
        .tasks()
        .tasks_for_range(range.start_date, range.end_date)
        .await?;
    Ok(Json(tasks))
}

/// POST /tasks
async fn create_task(
    State(state): State<AppState>,
    ApiJson(task): ApiJson<NewTask>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.tasks().create_task(&task).await?))
}

/// GET /tasks/:id
async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.tasks().get_task(&task_id).await?))
}

/// PUT /tasks/:id
async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    ApiJson(task): ApiJson<NewTask>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.tasks().update_task(&task_id, &task).await?))
}

/// DELETE /tasks/:id
async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.tasks().delete_task(&task_id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// POST /tasks/:id/done
async fn mark_task_done(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.tasks().mark_task_done(&task_id).await?))
}
