//! Kanban board: status columns and their reconciliation with the service.
//!
//! The board never patches its own state. Every mutation is a round trip
//! to the collaborator followed by a full re-fetch; the difference between
//! the old and new columns is reported as a [`BoardDiff`].

pub mod diff;
pub mod partition;
pub mod reconciler;

use std::fmt;
use std::str::FromStr;

use taskboard_proto::task::TaskStatus;

pub use diff::{BoardDiff, Move};
pub use partition::{Columns, partition};
pub use reconciler::{
    Board, BoardError, BoardEvent, DeletionRequest, Transition, TransitionOutcome,
};

/// A board column. Each column holds exactly the tasks of one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    /// Columns in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Status literal a task takes when dropped here.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        match self {
            Self::Todo => TaskStatus::Todo,
            Self::InProgress => TaskStatus::InProgress,
            Self::Done => TaskStatus::Done,
        }
    }

    /// The column a task with `status` belongs to.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => Self::Todo,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Done => Self::Done,
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "A fazer",
            Self::InProgress => "Fazendo",
            Self::Done => "Pronto",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when a drop target names no column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column {0:?}: use todo, in_progress, done or a column title")]
pub struct ParseColumnError(pub String);

impl FromStr for Column {
    type Err = ParseColumnError;

    /// Accepts a status literal (`in_progress`) or a column title in any
    /// case (`fazendo`). Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if let Ok(status) = needle.parse::<TaskStatus>() {
            return Ok(Self::for_status(status));
        }
        Self::ALL
            .into_iter()
            .find(|column| column.title().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseColumnError(s.to_string()))
    }
}
