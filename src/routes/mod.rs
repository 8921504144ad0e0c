pub mod auth;
pub mod health;
pub mod tasks;

use crate::auth::IdentityStore;
use crate::error::AppError;
use crate::storage::Storage;
use crate::tasks::{IdScheme, LocalTaskStore};
use actix_web::{error::JsonPayloadError, web, HttpRequest};
use std::sync::Arc;

/// Shared state of the task service. Both stores sit on the same storage handle.
#[derive(Clone)]
pub struct AppState {
    pub tasks: LocalTaskStore,
    pub identity: IdentityStore,
}

impl AppState {
    /// Server-side stores: task ids are UUIDs.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            tasks: LocalTaskStore::new(storage.clone()).with_id_scheme(IdScheme::Uuid),
            identity: IdentityStore::new(storage),
        }
    }

    pub fn with_identity(mut self, identity: IdentityStore) -> Self {
        self.identity = identity;
        self
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as every other failure.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(health::health)
        .service(tasks::list_tasks)
        .service(tasks::get_task)
        .service(tasks::create_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(auth::list_users)
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        );
}
