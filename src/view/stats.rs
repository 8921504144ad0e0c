use crate::models::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dashboard counters, always computed over the full (unfiltered) task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    /// Past deadline and not done.
    pub overdue: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_deadline;
    use pretty_assertions::assert_eq;

    fn task(status: TaskStatus, deadline: &str) -> Task {
        Task {
            id: deadline.to_string(),
            title: "t".to_string(),
            description: String::new(),
            status,
            deadline: parse_deadline(deadline).unwrap(),
            assignee_id: "1".to_string(),
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_overdue_drops_when_done() {
        let now = parse_deadline("2024-06-01T12:00:00Z").unwrap();
        let mut tasks = vec![task(TaskStatus::Todo, "2020-01-01")];
        assert_eq!(TaskStats::compute(&tasks, now).overdue, 1);

        tasks[0].status = TaskStatus::Done;
        assert_eq!(TaskStats::compute(&tasks, now).overdue, 0);
    }

    #[test]
    fn test_counts_per_status() {
        let now = parse_deadline("2024-06-01").unwrap();
        let tasks = vec![
            task(TaskStatus::Todo, "2030-01-01"),
            task(TaskStatus::InProgress, "2020-01-01"),
            task(TaskStatus::InProgress, "2030-01-02"),
            task(TaskStatus::Done, "2020-01-02"),
            // Due exactly now is not overdue yet.
            task(TaskStatus::Todo, "2024-06-01"),
        ];
        let stats = TaskStats::compute(&tasks, now);
        assert_eq!(
            stats,
            TaskStats {
                todo: 2,
                in_progress: 2,
                done: 1,
                overdue: 1,
            }
        );
        assert_eq!(stats.count(TaskStatus::InProgress), 2);
        assert_eq!(stats.total(), tasks.len());
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(TaskStats::compute(&[], Utc::now()), TaskStats::default());
    }
}
