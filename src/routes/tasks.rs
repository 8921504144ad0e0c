use crate::{
    error::AppError,
    models::{CreateTaskRequest, TaskUpdate},
    routes::AppState,
    tasks::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;
use serde_json::json;
use validator::Validate;

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, in creation order.
/// - `500 Internal Server Error`: If the backing storage cannot be read.
#[get("/database")]
pub async fn list_tasks(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: The `Task` as JSON.
/// - `404 Not Found`: No task has that ID.
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    match state.tasks.get_task(&task_id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Creates a new task.
///
/// The server assigns the ID and both timestamps.
///
/// ## Request Body:
/// The task fields (`title`, `description`, `status`, `deadline`, `assigneeId`)
/// plus `user_id`, the owner.
///
/// ## Responses:
/// - `201 Created`: The new `Task` as JSON.
/// - `400 Bad Request`: Malformed JSON or a missing `user_id`.
/// - `422 Unprocessable Entity`: Field validation failed (e.g. empty title).
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let CreateTaskRequest { task, user_id } = body.into_inner();
    if user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".into()));
    }
    task.validate()?;

    let created = state.tasks.create_task(task, &user_id).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Applies a partial update to a task.
///
/// Only the fields present in the body change; `updatedAt` is refreshed.
///
/// ## Responses:
/// - `200 OK`: The updated `Task` as JSON.
/// - `404 Not Found`: No task has that ID.
/// - `422 Unprocessable Entity`: A provided field failed validation.
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<String>,
    body: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let updated = state
        .tasks
        .update_task(&task_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{"msg": "Task deleted"}`.
/// - `404 Not Found`: `{"error": "Task not found"}`.
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    if !state.tasks.delete_task(&task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    info!("task {} deleted over HTTP", task_id);
    Ok(HttpResponse::Ok().json(json!({ "msg": "Task deleted" })))
}
