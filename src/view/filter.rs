use crate::models::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// The literal a filter control uses for "no restriction".
pub const ALL: &str = "all";

/// Status, assignee and free-text criteria. A task is shown when it passes all three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// `None` matches every status.
    pub status: Option<TaskStatus>,
    /// `None` matches every assignee.
    pub assignee: Option<String>,
    /// Empty matches everything; otherwise a case-insensitive substring of
    /// the title or the description.
    pub search: String,
}

impl TaskFilter {
    /// Builds a filter from raw control values, where `"all"` means no restriction.
    pub fn from_controls(status: &str, assignee: &str, search: &str) -> Result<Self, String> {
        let status = if status == ALL {
            None
        } else {
            Some(status.parse()?)
        };
        let assignee = (assignee != ALL).then(|| assignee.to_string());
        Ok(Self {
            status,
            assignee,
            search: search.to_string(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.assignee.is_some() || !self.search.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.map_or(true, |status| task.status == status);
        let assignee_ok = self
            .assignee
            .as_deref()
            .map_or(true, |assignee| task.assignee_id == assignee);
        status_ok && assignee_ok && matches_search(task, &self.search)
    }
}

fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    task.title.to_lowercase().contains(&query) || task.description.to_lowercase().contains(&query)
}

/// The subset of `tasks` that passes `filter`, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}
