//! The page controller: gates on the session, loads tasks, turns user actions
//! into store calls and keeps the filtered view and counters up to date.
//!
//! Store failures never escape as errors here. They become a [`Notice`], the
//! `loading` flag is cleared on every path, and the task list keeps its last
//! successfully loaded contents until the next reload.

use crate::auth::{IdentityStore, RegisterRequest};
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskUpdate, User};
use crate::tasks::TaskStore;
use crate::view::filter::{filter_tasks, TaskFilter};
use crate::view::stats::TaskStats;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A user-visible message about the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(err: &AppError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: err.message().to_string(),
        }
    }
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing has been created yet.
    NoTasks,
    /// Tasks exist but the filters hide all of them.
    NoMatches,
}

pub struct TaskBoard {
    identity: IdentityStore,
    store: Box<dyn TaskStore>,
    tasks: Vec<Task>,
    filter: TaskFilter,
    authenticated: bool,
    loading: bool,
    notice: Option<Notice>,
}

impl TaskBoard {
    pub fn new(identity: IdentityStore, store: Box<dyn TaskStore>) -> Self {
        Self {
            identity,
            store,
            tasks: Vec::new(),
            filter: TaskFilter::default(),
            authenticated: false,
            loading: false,
            notice: None,
        }
    }

    /// Picks up an existing session and loads tasks when there is one.
    pub async fn init(&mut self) -> bool {
        match self.identity.is_authenticated() {
            Ok(true) => {
                self.authenticated = true;
                self.reload().await
            }
            Ok(false) => {
                self.authenticated = false;
                true
            }
            Err(err) => self.fail(err),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let user = match self.identity.authenticate(username, password) {
            Ok(Some(user)) => user,
            Ok(None) => {
                return self.fail(AppError::Unauthorized("Invalid username or password".into()))
            }
            Err(err) => return self.fail(err),
        };
        self.open_session(user).await
    }

    pub async fn signup(&mut self, request: RegisterRequest) -> bool {
        match self.identity.register_user(&request) {
            Ok(user) => self.open_session(user).await,
            Err(err) => self.fail(err),
        }
    }

    async fn open_session(&mut self, user: User) -> bool {
        if let Err(err) = self.identity.set_current_user(&user) {
            return self.fail(err);
        }
        info!("'{}' signed in", user.username);
        self.authenticated = true;
        self.reload().await
    }

    pub fn logout(&mut self) -> bool {
        if let Err(err) = self.identity.logout() {
            return self.fail(err);
        }
        self.authenticated = false;
        self.tasks.clear();
        true
    }

    /// Replaces the task list with the store's current contents.
    pub async fn reload(&mut self) -> bool {
        self.loading = true;
        let result = self.store.list_tasks().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                true
            }
            Err(err) => self.fail(err),
        }
    }

    /// Creates a task, or updates `editing` with every field of the form.
    pub async fn submit(&mut self, editing: Option<&str>, input: TaskInput) -> bool {
        let owner = match self.session_user() {
            Ok(user) => user,
            Err(err) => return self.fail(err),
        };
        if let Err(err) = input.validate() {
            return self.fail(err.into());
        }

        self.loading = true;
        let result = match editing {
            Some(id) => self
                .store
                .update_task(id, TaskUpdate::from(input))
                .await
                .map(|_| "Task updated"),
            None => self
                .store
                .create_task(input, &owner.id)
                .await
                .map(|_| "Task created"),
        };
        self.loading = false;
        self.settle(result).await
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        if let Err(err) = self.session_user() {
            return self.fail(err);
        }

        self.loading = true;
        let result = self.store.delete_task(id).await;
        self.loading = false;
        let result = match result {
            Ok(true) => Ok("Task deleted"),
            Ok(false) => Err(AppError::NotFound("Task not found".into())),
            Err(err) => Err(err),
        };
        self.settle(result).await
    }

    /// The quick toggle: moves the task one step along Todo -> In Progress -> Done -> Todo.
    pub async fn advance_status(&mut self, id: &str) -> bool {
        if let Err(err) = self.session_user() {
            return self.fail(err);
        }
        let next = match self.tasks.iter().find(|task| task.id == id) {
            Some(task) => task.status.next(),
            None => return self.fail(AppError::NotFound("Task not found".into())),
        };

        self.loading = true;
        let result = self
            .store
            .update_task(id, TaskUpdate::status(next))
            .await
            .map(|_| "Status updated");
        self.loading = false;
        self.settle(result).await
    }

    async fn settle(&mut self, result: Result<&'static str, AppError>) -> bool {
        match result {
            Ok(message) => {
                self.notice = Some(Notice::info(message));
                self.reload().await
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: AppError) -> bool {
        if err.is_user_error() {
            warn!("{}", err);
        } else {
            error!("{}", err);
        }
        self.loading = false;
        self.notice = Some(Notice::error(&err));
        false
    }

    fn session_user(&self) -> Result<User, AppError> {
        if !self.authenticated {
            return Err(AppError::Unauthorized("Not signed in".into()));
        }
        self.identity
            .current_user()?
            .ok_or_else(|| AppError::Unauthorized("Not signed in".into()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn current_user(&self) -> Result<Option<User>, AppError> {
        self.identity.current_user()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Everything loaded, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn clear_filters(&mut self) {
        self.filter = TaskFilter::default();
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.filter)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        TaskStats::compute(&self.tasks, now)
    }

    /// `None` while at least one task is visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.tasks.is_empty() {
            Some(EmptyState::NoTasks)
        } else if self.visible_tasks().is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    /// Display name of the assignee. `None` when the id no longer resolves or
    /// the user list cannot be read.
    pub fn assignee_name(&self, task: &Task) -> Option<String> {
        match self.identity.find_user(&task.assignee_id) {
            Ok(user) => user.map(|user| user.name),
            Err(err) => {
                error!("failed to look up assignee {}: {}", task.assignee_id, err);
                None
            }
        }
    }
}
