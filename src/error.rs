//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the crate.
//! Local stores, the identity store, the remote task client and the HTTP handlers
//! all report failures through it, so callers only ever match on one type.
//!
//! `AppError` implements `actix_web::error::ResponseError` so the task service
//! handlers can return it directly; every variant becomes a JSON body of the
//! shape `{"error": "<message>"}`, which is also what the remote client parses
//! back out of failed responses.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the crate.
#[derive(Debug)]
pub enum AppError {
    /// Registration attempted with a username that is already taken (HTTP 409).
    DuplicateUsername(String),
    /// Registration attempted with an email that is already registered (HTTP 409).
    DuplicateEmail(String),
    /// The task or user targeted by an operation does not exist (HTTP 404).
    NotFound(String),
    /// Listing tasks from the remote service failed.
    Network(String),
    /// The remote service rejected or never received a create request.
    Create(String),
    /// The remote service rejected or never received an update request.
    Update(String),
    /// The remote service rejected or never received a delete request.
    /// Carries the server-supplied `error` message when there was one.
    Delete(String),
    /// Input failed validation (HTTP 422).
    Validation(String),
    /// No authenticated session, or bad credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed request or configuration value (HTTP 400).
    BadRequest(String),
    /// Reading or writing the persistence handle failed (HTTP 500).
    Storage(String),
    /// Represents an unexpected error (HTTP 500).
    InternalServerError(String),
}

impl AppError {
    /// The bare message, without the category prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AppError::DuplicateUsername(msg)
            | AppError::DuplicateEmail(msg)
            | AppError::NotFound(msg)
            | AppError::Network(msg)
            | AppError::Create(msg)
            | AppError::Update(msg)
            | AppError::Delete(msg)
            | AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Storage(msg)
            | AppError::InternalServerError(msg) => msg,
        }
    }

    /// Errors caused by what the user entered or did, as opposed to a failing
    /// backend or storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateUsername(_)
                | AppError::DuplicateEmail(_)
                | AppError::NotFound(_)
                | AppError::Validation(_)
                | AppError::Unauthorized(_)
                | AppError::BadRequest(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::DuplicateUsername(msg) => write!(f, "Duplicate Username: {}", msg),
            AppError::DuplicateEmail(msg) => write!(f, "Duplicate Email: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Network(msg) => write!(f, "Network Error: {}", msg),
            AppError::Create(msg) => write!(f, "Create Error: {}", msg),
            AppError::Update(msg) => write!(f, "Update Error: {}", msg),
            AppError::Delete(msg) => write!(f, "Delete Error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Client-side failures (`Network`, `Create`, `Update`, `Delete`) only show up here
/// when a handler forwards them, and are reported as a bad gateway.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "error": self.message() });
        match self {
            AppError::DuplicateUsername(_) | AppError::DuplicateEmail(_) => {
                HttpResponse::Conflict().json(body)
            }
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::Validation(_) => HttpResponse::UnprocessableEntity().json(body),
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::Network(_)
            | AppError::Create(_)
            | AppError::Update(_)
            | AppError::Delete(_) => HttpResponse::BadGateway().json(body),
            // Storage failures are presented as generic internal server errors.
            AppError::Storage(_) | AppError::InternalServerError(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Malformed persisted JSON is a storage problem, not something to paper over.
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::Storage(format!("invalid JSON: {}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::Storage(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_are_told_apart_from_failures() {
        assert!(AppError::Unauthorized("Not signed in".into()).is_user_error());
        assert!(AppError::Validation("title: required".into()).is_user_error());
        assert!(AppError::DuplicateEmail("Email already exists".into()).is_user_error());
        assert!(!AppError::Network("connection refused".into()).is_user_error());
        assert!(!AppError::Storage("disk full".into()).is_user_error());
        assert!(!AppError::Delete("Task is locked".into()).is_user_error());
    }

    #[test]
    fn test_error_responses() {
        let error = AppError::DuplicateUsername("Username already exists".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Validation("title: too short".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::Unauthorized("Invalid credentials".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Storage("disk full".into());
        assert_eq!(error.error_response().status(), 500);

        let error = AppError::Delete("Failed to delete task".into());
        assert_eq!(error.error_response().status(), 502);
    }

    #[test]
    fn test_message_strips_category() {
        let error = AppError::Delete("Task not found".into());
        assert_eq!(error.message(), "Task not found");
        assert_eq!(error.to_string(), "Delete Error: Task not found");
    }
}
