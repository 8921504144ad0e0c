use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate};
use crate::storage::{read_json, write_json, Storage, TASKS_KEY};
use crate::tasks::TaskStore;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;
use validator::Validate;

/// How new task ids are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
    /// Milliseconds since the epoch, bumped past ids already in use.
    #[default]
    Timestamp,
    /// Random UUID v4, as handed out by the task service.
    Uuid,
}

/// Task store over the `tasks` key of a storage handle.
///
/// Every mutation is a read-modify-write of the whole list, serialized by an
/// internal lock. Nothing beyond that: two callers editing the same task
/// still race and the last write wins.
#[derive(Clone)]
pub struct LocalTaskStore {
    storage: Arc<dyn Storage>,
    ids: IdScheme,
    write_lock: Arc<Mutex<()>>,
}

impl LocalTaskStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            ids: IdScheme::default(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_id_scheme(mut self, ids: IdScheme) -> Self {
        self.ids = ids;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::Storage("task store lock poisoned".into()))
    }

    fn load(&self) -> Result<Vec<Task>, AppError> {
        Ok(read_json(self.storage.as_ref(), TASKS_KEY)?.unwrap_or_default())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), AppError> {
        write_json(self.storage.as_ref(), TASKS_KEY, tasks)
    }

    fn next_id(&self, tasks: &[Task]) -> String {
        match self.ids {
            IdScheme::Uuid => Uuid::new_v4().to_string(),
            IdScheme::Timestamp => {
                let mut candidate = Utc::now().timestamp_millis();
                while tasks.iter().any(|t| t.id == candidate.to_string()) {
                    candidate += 1;
                }
                candidate.to_string()
            }
        }
    }
}

#[async_trait]
impl TaskStore for LocalTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.load()
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        Ok(self.load()?.into_iter().find(|task| task.id == id))
    }

    async fn create_task(&self, input: TaskInput, owner_id: &str) -> Result<Task, AppError> {
        input.validate()?;

        let _guard = self.lock()?;
        let mut tasks = self.load()?;
        let task = Task::new(input, self.next_id(&tasks), owner_id, Utc::now());
        tasks.push(task.clone());
        self.save(&tasks)?;

        info!("created task {} for owner {}", task.id, owner_id);
        Ok(task)
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, AppError> {
        update.validate()?;

        let _guard = self.lock()?;
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        update.apply(task);
        task.updated_at = Some(Utc::now());
        let updated = task.clone();
        self.save(&tasks)?;

        debug!("updated task {}", id);
        Ok(updated)
    }

    async fn delete_task(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.lock()?;
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            debug!("delete ignored: no task {}", id);
            return Ok(false);
        }
        self.save(&tasks)?;

        info!("deleted task {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_deadline, TaskStatus};
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn store() -> LocalTaskStore {
        LocalTaskStore::new(Arc::new(MemoryStorage::new()))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: "Quarterly numbers".to_string(),
            status: TaskStatus::Todo,
            deadline: parse_deadline("2031-03-15").unwrap(),
            assignee_id: "2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = store();
        let before = Utc::now();

        let created = store.create_task(input("Write report"), "1").await.unwrap();
        let tasks = store.list_tasks().await.unwrap();

        assert_eq!(tasks, vec![created.clone()]);
        assert!(!created.id.is_empty());
        assert_eq!(created.title, "Write report");
        assert_eq!(created.owner_id.as_deref(), Some("1"));
        assert!(created.created_at.unwrap() >= before);
        assert!(created.updated_at.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_timestamp_ids_are_unique() {
        let store = store();
        let a = store.create_task(input("a"), "1").await.unwrap();
        let b = store.create_task(input("b"), "1").await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_uuid_ids() {
        let store = store().with_id_scheme(IdScheme::Uuid);
        let task = store.create_task(input("a"), "1").await.unwrap();
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_persisted() {
        let store = store();
        let err = store.create_task(input(""), "1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_update_touches_only_status_and_updated_at() {
        let store = store();
        let created = store.create_task(input("Write report"), "1").await.unwrap();

        let updated = store
            .update_task(&created.id, TaskUpdate::status(TaskStatus::Done))
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(
            Task {
                status: created.status,
                updated_at: created.updated_at,
                ..updated.clone()
            },
            created
        );
        assert_eq!(store.get_task(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let store = store();
        let err = store
            .update_task("nope", TaskUpdate::status(TaskStatus::Done))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store();
        let keep = store.create_task(input("keep"), "1").await.unwrap();
        let gone = store.create_task(input("gone"), "1").await.unwrap();

        assert!(!store.delete_task("missing").await.unwrap());
        assert_eq!(store.list_tasks().await.unwrap().len(), 2);

        assert!(store.delete_task(&gone.id).await.unwrap());
        assert_eq!(store.list_tasks().await.unwrap(), vec![keep]);
    }
}
