//! Task records and request bodies for the `/task/` endpoints.
//!
//! A [`Task`] is always in exactly one [`TaskStatus`]; the board derives its
//! columns from that field alone.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Maximum allowed description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Maximum allowed sector (`name_class`) length in characters.
pub const MAX_NAME_CLASS_LENGTH: usize = 15;

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not one of an enum's literal tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} {got:?}: expected one of {expected}")]
pub struct ParseTokenError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub got: String,
    /// The accepted tokens, for display.
    pub expected: &'static str,
}

/// Status column of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the wire token for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseTokenError {
                kind: "status",
                got: other.to_string(),
                expected: "todo, in_progress, done",
            }),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal.
    Mid,
    /// Urgent.
    High,
}

impl TaskPriority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    /// Returns the wire token for this priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "mid" => Ok(Self::Mid),
            "high" => Ok(Self::High),
            other => Err(ParseTokenError {
                kind: "priority",
                got: other.to_string(),
                expected: "low, mid, high",
            }),
        }
    }
}

/// A task as returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Free-text description (already normalized on creation).
    pub description: String,
    /// Sector the task belongs to, title-cased.
    pub name_class: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Current status column.
    pub status: TaskStatus,
    /// Owning user.
    pub user: UserId,
    /// Creation date, immutable.
    pub register_date: NaiveDate,
    /// Last mutation stamp as the server formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
}

/// Body of `POST /task/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Normalized description.
    pub description: String,
    /// Normalized sector name.
    pub name_class: String,
    /// Chosen priority.
    pub priority: TaskPriority,
    /// Initial status.
    pub status: TaskStatus,
    /// Owning user.
    pub user: UserId,
    /// Creation date stamp (`YYYY-MM-DD`).
    pub register_date: NaiveDate,
}

/// Body of `PATCH /task/{id}`. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New sector name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_class: Option<String>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// A patch that only moves the task to another column.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.name_class.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Applies the patch to a task in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(name_class) = &self.name_class {
            task.name_class.clone_from(name_class);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}
