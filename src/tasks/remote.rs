use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, TaskInput, TaskUpdate};
use crate::tasks::TaskStore;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response, StatusCode};

/// Task store backed by the HTTP task service.
///
/// Ids and timestamps are whatever the server hands back. Requests are not
/// retried, batched or cancelled; each failure is logged and returned.
#[derive(Debug, Clone)]
pub struct RemoteTaskStore {
    client: Client,
    base_url: String,
}

impl RemoteTaskStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Pulls the `error` field out of a failed response body, if there is one.
async fn server_message(response: Response) -> Option<String> {
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error")?.as_str().map(str::to_string))
}

/// Turns a non-success response into `wrap(server message or fallback)`.
async fn failure(
    response: Response,
    fallback: &str,
    wrap: fn(String) -> AppError,
) -> AppError {
    let status = response.status();
    let message = server_message(response)
        .await
        .unwrap_or_else(|| fallback.to_string());
    error!("task service answered {}: {}", status, message);
    wrap(message)
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let response = self
            .client
            .get(self.url("/database"))
            .send()
            .await
            .map_err(|e| {
                error!("error loading tasks: {}", e);
                AppError::Network(e.to_string())
            })?;
        if !response.status().is_success() {
            return Err(failure(response, "Failed to load tasks", AppError::Network).await);
        }
        let tasks: Vec<Task> = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("invalid task list: {}", e)))?;
        debug!("loaded {} tasks from {}", tasks.len(), self.base_url);
        Ok(tasks)
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        let response = self
            .client
            .get(self.url(&format!("/tasks/{}", id)))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure(response, "Failed to load task", AppError::Network).await);
        }
        let task = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("invalid task: {}", e)))?;
        Ok(Some(task))
    }

    async fn create_task(&self, input: TaskInput, owner_id: &str) -> Result<Task, AppError> {
        let body = CreateTaskRequest {
            task: input,
            user_id: owner_id.to_string(),
        };
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("error creating task: {}", e);
                AppError::Create(e.to_string())
            })?;
        if !response.status().is_success() {
            return Err(failure(response, "Failed to create task", AppError::Create).await);
        }
        response
            .json()
            .await
            .map_err(|e| AppError::Create(format!("invalid task: {}", e)))
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, AppError> {
        let response = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(&update)
            .send()
            .await
            .map_err(|e| {
                error!("error updating task {}: {}", id, e);
                AppError::Update(e.to_string())
            })?;
        if !response.status().is_success() {
            return Err(failure(response, "Failed to update task", AppError::Update).await);
        }
        response
            .json()
            .await
            .map_err(|e| AppError::Update(format!("invalid task: {}", e)))
    }

    async fn delete_task(&self, id: &str) -> Result<bool, AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await
            .map_err(|e| {
                error!("error deleting task {}: {}", id, e);
                AppError::Delete(e.to_string())
            })?;
        if !response.status().is_success() {
            return Err(failure(response, "Failed to delete task", AppError::Delete).await);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = RemoteTaskStore::new("http://localhost:5000/");
        assert_eq!(store.base_url(), "http://localhost:5000");
        assert_eq!(store.url("/tasks/7"), "http://localhost:5000/tasks/7");
    }

    #[tokio::test]
    async fn test_unreachable_service_maps_to_operation_errors() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let store = RemoteTaskStore::new("http://127.0.0.1:9");

        assert!(matches!(store.list_tasks().await, Err(AppError::Network(_))));
        assert!(matches!(
            store.update_task("1", TaskUpdate::default()).await,
            Err(AppError::Update(_))
        ));
        assert!(matches!(store.delete_task("1").await, Err(AppError::Delete(_))));
    }
}
