use crate::{error::AppError, routes::AppState, tasks::TaskStore};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Returns the service status, the current timestamp and how many tasks are stored.
/// Fails with `500` when the task storage cannot be read.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_tasks().await?.len();
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "tasks": tasks
    })))
}
