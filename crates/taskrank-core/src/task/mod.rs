//! Task and category records as handed over by the task store.
//!
//! The ranking engine only reads these. Field names follow the camelCase
//! shape of the task store's JSON, and every field the scorer depends on is
//! read leniently: unknown levels become `medium`, unreadable deadlines
//! become "no deadline".

pub mod deadline;
pub mod level;

pub use deadline::parse_deadline;
pub use level::Level;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifiers arrive either as strings or as integer row ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

pub(crate) fn deserialize_opt_id<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(d).map(|raw| raw.map(String::from))
}

/// An unfinished task belonging to one user.
///
/// The deadline is read from `deadline` or, failing that, `deadlineDate`;
/// records carrying both keys are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TaskRecord")]
pub struct Task {
    pub id: String,
    /// Owning user; only present when tasks of several users share a store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub fun: Level,
    pub difficulty: Level,
    pub importance: Level,
    pub time: Level,
    pub is_pinned: bool,
    pub is_finished: bool,
}

/// Task as stored; both deadline spellings are kept apart so neither clashes.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    category_id: Option<String>,
    #[serde(default, deserialize_with = "deadline::deserialize_lenient")]
    deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deadline::deserialize_lenient")]
    deadline_date: Option<DateTime<Utc>>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    fun: Level,
    #[serde(default)]
    difficulty: Level,
    #[serde(default)]
    importance: Level,
    #[serde(default)]
    time: Level,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    is_finished: bool,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            category_id: record.category_id,
            deadline: record.deadline.or(record.deadline_date),
            title: record.title,
            description: record.description,
            fun: record.fun,
            difficulty: record.difficulty,
            importance: record.importance,
            time: record.time,
            is_pinned: record.is_pinned,
            is_finished: record.is_finished,
        }
    }
}

impl Task {
    /// Create an unpinned task with every attribute at `medium` and no deadline.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            category_id: None,
            deadline: None,
            title: title.into(),
            description: String::new(),
            fun: Level::Medium,
            difficulty: Level::Medium,
            importance: Level::Medium,
            time: Level::Medium,
            is_pinned: false,
            is_finished: false,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_levels(mut self, fun: Level, difficulty: Level, importance: Level, time: Level) -> Self {
        self.fun = fun;
        self.difficulty = difficulty;
        self.importance = importance;
        self.time = time;
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn finished(mut self, is_finished: bool) -> Self {
        self.is_finished = is_finished;
        self
    }
}

/// A user-defined grouping of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_reads_store_json() {
        let json = r#"{
            "id": 7,
            "userId": 3,
            "categoryId": null,
            "deadlineDate": "2024-05-01 12:00:00",
            "title": "Pay rent",
            "fun": "low",
            "difficulty": "short",
            "importance": "high",
            "isPinned": true
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, "7");
        assert_eq!(task.user_id.as_deref(), Some("3"));
        assert_eq!(task.category_id, None);
        assert_eq!(task.deadline.unwrap().to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert_eq!(task.fun, Level::Low);
        assert_eq!(task.difficulty, Level::Low);
        assert_eq!(task.importance, Level::High);
        assert_eq!(task.time, Level::Medium);
        assert!(task.is_pinned);
        assert!(!task.is_finished);
        assert_eq!(task.description, "");
    }

    #[test]
    fn malformed_deadline_reads_as_none() {
        let task: Task =
            serde_json::from_str(r#"{"id": "a", "deadline": "someday soon"}"#).unwrap();
        assert!(task.deadline.is_none());
    }

    #[test]
    fn both_deadline_keys_prefer_deadline() {
        let task: Task = serde_json::from_str(
            r#"{"id": 1, "deadline": "2024-05-01", "deadlineDate": "2024-06-01"}"#,
        )
        .unwrap();
        assert_eq!(task.deadline.unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let task: Task = serde_json::from_str(
            r#"{"id": 1, "deadline": "not a date", "deadlineDate": "2024-06-01"}"#,
        )
        .unwrap();
        assert_eq!(task.deadline.unwrap().to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task::new("1", "Write report").pinned(true);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["isPinned"], serde_json::Value::Bool(true));
        assert_eq!(value["fun"], "medium");
        assert!(value.get("userId").is_none());
    }

    #[test]
    fn category_accepts_integer_ids() {
        let cat: Category =
            serde_json::from_str(r#"{"id": 2, "userId": "9", "name": "Home"}"#).unwrap();
        assert_eq!(cat.id, "2");
        assert_eq!(cat.user_id, "9");
    }
}
