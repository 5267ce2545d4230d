//! Splitting a flat task list into status columns.

use taskboard_proto::task::{Task, TaskId};

use super::Column;

/// Tasks grouped by column, each column in the service's list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    todo: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

/// Partitions `tasks` by status, preserving relative order within each
/// column.
#[must_use]
pub fn partition(tasks: impl IntoIterator<Item = Task>) -> Columns {
    let mut columns = Columns::default();
    for task in tasks {
        columns.bucket_mut(Column::for_status(task.status)).push(task);
    }
    columns
}

impl Columns {
    /// Tasks in one column.
    #[must_use]
    pub fn get(&self, column: Column) -> &[Task] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    fn bucket_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }

    /// Columns with their tasks, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &[Task])> {
        Column::ALL.into_iter().map(|column| (column, self.get(column)))
    }

    /// All tasks, column by column.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(&self.in_progress)
            .chain(&self.done)
    }

    /// Looks a task up by id.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks().find(|task| task.id == id)
    }

    /// The column currently holding task `id`.
    #[must_use]
    pub fn column_of(&self, id: TaskId) -> Option<Column> {
        self.find(id).map(|task| Column::for_status(task.status))
    }

    /// Total number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
