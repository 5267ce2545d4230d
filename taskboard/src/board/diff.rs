//! What changed between two board snapshots.

use std::collections::HashMap;

use taskboard_proto::task::{Task, TaskId};

use super::{Column, Columns};

/// A task that changed column between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub id: TaskId,
    pub from: Column,
    pub to: Column,
}

/// Difference between the board before and after a re-fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDiff {
    /// Tasks only in the new snapshot.
    pub added: Vec<TaskId>,
    /// Tasks only in the old snapshot.
    pub removed: Vec<TaskId>,
    /// Tasks whose column changed.
    pub moved: Vec<Move>,
    /// Tasks that stayed in their column but changed otherwise.
    pub edited: Vec<TaskId>,
}

impl BoardDiff {
    /// Compares two snapshots. Ids are listed in board order: the new
    /// snapshot's for `added`, `moved` and `edited`, the old one's for
    /// `removed`.
    #[must_use]
    pub fn between(before: &Columns, after: &Columns) -> Self {
        let old: HashMap<TaskId, &Task> = before.tasks().map(|t| (t.id, t)).collect();
        let mut diff = Self::default();

        for task in after.tasks() {
            match old.get(&task.id) {
                None => diff.added.push(task.id),
                Some(prev) if prev.status != task.status => diff.moved.push(Move {
                    id: task.id,
                    from: Column::for_status(prev.status),
                    to: Column::for_status(task.status),
                }),
                Some(prev) if *prev != task => diff.edited.push(task.id),
                Some(_) => {}
            }
        }

        diff.removed = before
            .tasks()
            .filter(|t| after.find(t.id).is_none())
            .map(|t| t.id)
            .collect();
        diff
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.moved.is_empty()
            && self.edited.is_empty()
    }
}
