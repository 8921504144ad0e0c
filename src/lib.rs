#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Users sign in through the identity store, then create, edit, delete and filter"]
#![doc = "tasks held by one of two interchangeable task stores: local persistent storage"]
#![doc = "or the HTTP task service that the `taskboard` binary runs."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;
pub mod tasks;
pub mod view;

use std::sync::Arc;

pub use crate::error::AppError;
pub use crate::models::{Task, TaskInput, TaskStatus, TaskUpdate, User};
pub use crate::tasks::TaskStore;
pub use crate::view::{TaskBoard, TaskFilter, TaskStats};

/// Builds the task store the configuration asks for.
///
/// The local store shares `storage` with the identity store; the remote one
/// ignores it and talks to `config.api_url`.
pub fn task_store_for(
    config: &config::Config,
    storage: Arc<dyn storage::Storage>,
) -> Box<dyn TaskStore> {
    match config.backend {
        config::Backend::Local => Box::new(tasks::LocalTaskStore::new(storage)),
        config::Backend::Remote => Box::new(tasks::RemoteTaskStore::new(config.api_url.clone())),
    }
}
