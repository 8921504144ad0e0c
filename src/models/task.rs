use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Represents the status of a task.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    /// The status a quick toggle moves to: Todo -> In Progress -> Done -> Todo.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown task status '{}'", s)),
        }
    }
}

/// Parses a deadline the way a browser `Date` would: either a bare calendar
/// date (midnight UTC) or a full timestamp.
pub fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
        .map_err(|_| format!("invalid deadline '{}'", raw))
}

mod deadline_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(deadline: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&deadline.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_deadline(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(deadline: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match deadline {
                Some(deadline) => super::serialize(deadline, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| crate::models::task::parse_deadline(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Payload of the create/edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must be between 1 and 200 characters and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(with = "deadline_format")]
    pub deadline: DateTime<Utc>,

    #[validate(length(min = 1))]
    pub assignee_id: String,
}

/// Body of `POST /tasks`: the task fields plus the owner's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(flatten)]
    pub task: TaskInput,
    pub user_id: String,
}

/// A partial update: only the fields that are `Some` get written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "deadline_format::option"
    )]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub assignee_id: Option<String>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Merges the provided fields into `task`. Timestamps are the caller's job.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(assignee_id) = &self.assignee_id {
            task.assignee_id = assignee_id.clone();
        }
    }
}

/// An edit form submits every field.
impl From<TaskInput> for TaskUpdate {
    fn from(input: TaskInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            status: Some(input.status),
            deadline: Some(input.deadline),
            assignee_id: Some(input.assignee_id),
        }
    }
}

/// A task as persisted locally or returned by the task service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "deadline_format")]
    pub deadline: DateTime<Utc>,
    /// Non-owning reference to a `User`; may dangle if that user disappears.
    pub assignee_id: String,
    /// The user who created the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// The remote service may leave timestamps out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a freshly created task with both timestamps set to `now`.
    pub fn new(input: TaskInput, id: String, owner_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
            deadline: input.deadline,
            assignee_id: input.assignee_id,
            owner_id: Some(owner_id.to_string()),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Deadline strictly before `now` and not yet done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now && self.status != TaskStatus::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: "Test Description".to_string(),
            status: TaskStatus::Todo,
            deadline: parse_deadline("2030-05-01").unwrap(),
            assignee_id: "2".to_string(),
        }
    }

    #[test]
    fn test_task_creation() {
        let now = Utc::now();
        let task = Task::new(input("Test Task"), "42".into(), "1", now);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.owner_id.as_deref(), Some("1"));
        assert_eq!(task.created_at, Some(now));
        assert_eq!(task.updated_at, Some(now));
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input("   ").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut no_assignee = input("Valid Task");
        no_assignee.assignee_id.clear();
        assert!(no_assignee.validate().is_err());

        let mut long_description = input("Valid Task");
        long_description.description = "b".repeat(1001);
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_status_cycle_and_wire_names() {
        assert_eq!(TaskStatus::Todo.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.next(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Todo);

        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!("in progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_deadline_accepts_date_and_timestamp() {
        let date = parse_deadline("2020-01-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2020-01-01T00:00:00+00:00");

        let stamp = parse_deadline("2020-01-01T10:30:00.000Z").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2020-01-01T10:30:00+00:00");

        assert!(parse_deadline("next tuesday").is_err());
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let raw = r#"{
            "id": "7",
            "title": "Write report",
            "description": "",
            "status": "In Progress",
            "deadline": "2020-01-01",
            "assigneeId": "3"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assignee_id, "3");
        assert!(task.created_at.is_none());

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assigneeId"], "3");
        assert_eq!(json["deadline"], "2020-01-01T00:00:00.000Z");
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_update_applies_only_provided_fields() {
        let now = Utc::now();
        let original = Task::new(input("Keep me"), "1".into(), "1", now);
        let mut task = original.clone();

        TaskUpdate::status(TaskStatus::Done).apply(&mut task);

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(
            Task {
                status: original.status,
                ..task.clone()
            },
            original
        );

        let body = serde_json::to_value(TaskUpdate::status(TaskStatus::Done)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "Done" }));
    }

    #[test]
    fn test_overdue() {
        let mut task = Task::new(input("Old"), "1".into(), "1", Utc::now());
        task.deadline = parse_deadline("2020-01-01").unwrap();
        let now = parse_deadline("2024-06-01").unwrap();
        assert!(task.is_overdue(now));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(now));

        task.status = TaskStatus::Todo;
        assert!(!task.is_overdue(task.deadline));
    }
}
