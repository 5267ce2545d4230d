//! Applies status changes and deletions through the collaborator, then
//! re-fetches.

use std::fmt;

use taskboard_proto::task::{TaskId, TaskPatch, TaskStatus};
use tokio::sync::mpsc;

use super::{BoardDiff, Column, Columns, partition};
use crate::api::{ApiError, Collaborator};
use crate::feedback::{self, Acknowledgment};

/// Errors from board operations. Collaborator failures have already been
/// acknowledged on the event channel when they are returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The task is not on the board; reload first.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),

    /// The collaborator call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a status change was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A task card was dropped on a column.
    Drag,
    /// A status was picked in the task's own control and confirmed.
    Manual,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drag => write!(f, "drag"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Result of a status change that was allowed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task already had the requested status; nothing was sent.
    Unchanged,
    /// The status was patched and the board re-fetched.
    Applied,
}

/// Events emitted by the [`Board`] for the host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The columns were replaced by a fresh snapshot.
    Reloaded(BoardDiff),
    /// A one-shot message for the user.
    Acknowledged(Acknowledgment),
}

/// A pending deletion, confirmed with [`Board::confirm_deletion`] or
/// abandoned by dropping it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a deletion only happens once the request is confirmed"]
pub struct DeletionRequest {
    task_id: TaskId,
    description: String,
}

impl DeletionRequest {
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Description of the task, for the confirmation prompt.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Client-side view of the board.
pub struct Board<C: Collaborator> {
    api: C,
    columns: Columns,
    event_tx: mpsc::Sender<BoardEvent>,
}

impl<C: Collaborator> Board<C> {
    /// Creates an empty board and the receiver for its [`BoardEvent`]s.
    pub fn new(api: C, event_buffer: usize) -> (Self, mpsc::Receiver<BoardEvent>) {
        let (event_tx, event_rx) = mpsc::channel(event_buffer.max(1));
        let board = Self {
            api,
            columns: Columns::default(),
            event_tx,
        };
        (board, event_rx)
    }

    /// Current columns.
    #[must_use]
    pub const fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Re-fetches the task list and replaces the columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Api`] if the list cannot be fetched; the
    /// columns are left as they were.
    pub async fn reload(&mut self) -> Result<BoardDiff, BoardError> {
        let tasks = match self.api.list_tasks().await {
            Ok(tasks) => tasks,
            Err(e) => return Err(self.caught(e, "failed to load tasks")),
        };
        let next = partition(tasks);
        let diff = BoardDiff::between(&self.columns, &next);
        tracing::debug!(
            tasks = next.len(),
            added = diff.added.len(),
            removed = diff.removed.len(),
            moved = diff.moved.len(),
            "board reloaded"
        );
        self.columns = next;
        self.emit(BoardEvent::Reloaded(diff.clone()));
        Ok(diff)
    }

    /// Handles a task card dropped on `target`.
    ///
    /// # Errors
    ///
    /// See [`change_status`](Self::change_status).
    pub async fn drop_task(
        &mut self,
        id: TaskId,
        target: Column,
    ) -> Result<TransitionOutcome, BoardError> {
        self.transition(id, target.status(), Transition::Drag).await
    }

    /// Applies a status picked in the task's inline control.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] if the task is not on the board,
    /// or [`BoardError::Api`] if the patch fails (the columns are then
    /// unchanged).
    pub async fn change_status(
        &mut self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<TransitionOutcome, BoardError> {
        self.transition(id, status, Transition::Manual).await
    }

    async fn transition(
        &mut self,
        id: TaskId,
        status: TaskStatus,
        via: Transition,
    ) -> Result<TransitionOutcome, BoardError> {
        let current = self.columns.find(id).ok_or(BoardError::UnknownTask(id))?;
        if current.status == status {
            tracing::debug!(task_id = %id, %status, %via, "status unchanged");
            return Ok(TransitionOutcome::Unchanged);
        }

        if let Err(e) = self.api.update_task(id, &TaskPatch::status(status)).await {
            return Err(self.caught(e, "status change failed"));
        }
        tracing::info!(task_id = %id, %status, %via, "status changed");
        self.emit(BoardEvent::Acknowledged(Acknowledgment::success(feedback::STATUS_UPDATED)));
        self.refresh().await;
        Ok(TransitionOutcome::Applied)
    }

    /// First step of deleting a task: returns a request to confirm.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] if the task is not on the board.
    pub fn request_deletion(&self, id: TaskId) -> Result<DeletionRequest, BoardError> {
        let task = self.columns.find(id).ok_or(BoardError::UnknownTask(id))?;
        Ok(DeletionRequest {
            task_id: id,
            description: task.description.clone(),
        })
    }

    /// Deletes the task named by a confirmed request, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Api`] if the deletion fails; the columns are
    /// then unchanged.
    pub async fn confirm_deletion(&mut self, request: DeletionRequest) -> Result<(), BoardError> {
        let id = request.task_id;
        if let Err(e) = self.api.delete_task(id).await {
            return Err(self.caught(e, "deletion failed"));
        }
        tracing::info!(task_id = %id, "task deleted");
        self.emit(BoardEvent::Acknowledged(Acknowledgment::success(feedback::TASK_DELETED)));
        self.refresh().await;
        Ok(())
    }

    // The mutation already succeeded; a failed re-fetch was acknowledged by
    // `reload` and leaves the previous columns in place.
    async fn refresh(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::debug!(error = %e, "board is stale after mutation");
        }
    }

    fn caught(&self, e: ApiError, what: &'static str) -> BoardError {
        tracing::warn!(error = %e, "{what}");
        self.emit(BoardEvent::Acknowledged(Acknowledgment::from_api_error(&e)));
        BoardError::Api(e)
    }

    fn emit(&self, event: BoardEvent) {
        let _ = self.event_tx.try_send(event);
    }
}
