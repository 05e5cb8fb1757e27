use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;
use super::text::{sanitize, MAX_TASK_TITLE_LENGTH};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ListId(pub String);

impl Default for TaskId {
    fn default() -> Self { Self(Uuid::new_v4().to_string()) }
}

impl Default for ListId {
    fn default() -> Self { Self(Uuid::new_v4().to_string()) }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a pending task with a fresh id, stamped with the current time.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: TaskId::default(),
            title: task_title(title)?,
            completed: false,
            created_at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) { self.completed = !self.completed; }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = task_title(title)?;
        Ok(())
    }
}

fn task_title(raw: &str) -> Result<String, ValidationError> {
    let title = sanitize(raw, MAX_TASK_TITLE_LENGTH);
    if title.is_empty() {
        return Err(ValidationError::Empty { field: "task title" });
    }
    Ok(title)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl TodoList {
    /// An empty list. `name` must already be sanitized and non-empty;
    /// `Document::create_list` is the validating entry point.
    pub(crate) fn with_name(name: String) -> Self {
        Self { id: ListId::default(), name, tasks: Vec::new() }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> { self.tasks.iter().find(|t| &t.id == id) }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> { self.tasks.iter_mut().find(|t| &t.id == id) }

    pub fn add_task(&mut self, title: &str) -> Result<&Task, ValidationError> {
        self.tasks.push(Task::new(title)?);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        self.tasks.len() != before
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> { self.tasks.iter().filter(|t| !t.completed) }

    pub fn completed_tasks(&self) -> impl Iterator<Item = &Task> { self.tasks.iter().filter(|t| t.completed) }

    /// `(completed, total)`, as shown in the sidebar badge.
    pub fn progress(&self) -> (usize, usize) { (self.completed_tasks().count(), self.tasks.len()) }
}

/// RFC 3339 on write. Reads also accept offset-less ISO-8601 timestamps,
/// which are taken as local time.
mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        match naive.and_local_timezone(Local).earliest() {
            Some(local) => Some(local.with_timezone(&Utc)),
            None => Some(naive.and_utc()),
        }
    }
}
