//! Task persistence behind one contract with two interchangeable backends.
//!
//! [`LocalTaskStore`] keeps the task list in the injected storage handle;
//! [`RemoteTaskStore`] talks to the task service over HTTP. Callers pick one
//! at construction time and hold it as `Box<dyn TaskStore>`.

pub mod local;
pub mod remote;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate};
use async_trait::async_trait;

pub use local::{IdScheme, LocalTaskStore};
pub use remote::RemoteTaskStore;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, in storage order.
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// A single task, or `None` when no task has that id.
    async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError>;

    /// Creates a task owned by `owner_id` and returns it with its assigned id.
    async fn create_task(&self, input: TaskInput, owner_id: &str) -> Result<Task, AppError>;

    /// Merges `update` into the task. A missing task is `NotFound` locally
    /// and an `Update` error remotely.
    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, AppError>;

    /// Removes the task. The local store answers `Ok(false)` for an unknown id;
    /// the remote store turns any non-success status into a `Delete` error.
    async fn delete_task(&self, id: &str) -> Result<bool, AppError>;
}
