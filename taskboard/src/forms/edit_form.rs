//! Task edit form: `GET /task/{id}`, edit, `PATCH /task/{id}`.

use taskboard_proto::task::{Task, TaskId};
use tokio::sync::mpsc;

use super::{FormError, FormEvent, FormKind, FormSettings, FormState, Lifecycle, SubmitOutcome};
use crate::api::Collaborator;
use crate::feedback::{self, Acknowledgment};
use crate::validation::{
    FieldErrors, TaskEditInput, TaskField, check_task_edit_field, validate_task_edit,
};

/// Controller for editing an existing task.
///
/// Must be [`load`](Self::load)ed before it can be submitted. The owner of
/// the task is shown but cannot be changed.
pub struct TaskEditForm<C: Collaborator> {
    api: C,
    task_id: TaskId,
    loaded: Option<Task>,
    input: TaskEditInput,
    errors: FieldErrors<TaskField>,
    lifecycle: Lifecycle,
}

impl<C: Collaborator> TaskEditForm<C> {
    /// Creates a form for task `task_id` and the receiver for its events.
    pub fn new(
        api: C,
        task_id: TaskId,
        settings: &FormSettings,
    ) -> (Self, mpsc::Receiver<FormEvent>) {
        let (lifecycle, event_rx) = Lifecycle::new(FormKind::TaskEdit, settings.event_buffer);
        let form = Self {
            api,
            task_id,
            loaded: None,
            input: TaskEditInput::default(),
            errors: FieldErrors::new(),
            lifecycle,
        };
        (form, event_rx)
    }

    /// Fetches the task and fills the fields with its current values.
    ///
    /// On failure the form stays unloaded and `Erro ao carregar tarefa` is
    /// acknowledged. Returns `true` if the task was loaded.
    pub async fn load(&mut self) -> bool {
        match self.api.get_task(self.task_id).await {
            Ok(task) => {
                tracing::debug!(task_id = %task.id, "loaded task for editing");
                self.input = TaskEditInput::from(&task);
                self.errors = FieldErrors::new();
                self.loaded = Some(task);
                true
            }
            Err(e) => {
                tracing::warn!(task_id = %self.task_id, error = %e, "failed to load task");
                self.loaded = None;
                self.lifecycle
                    .acknowledge(Acknowledgment::error(feedback::TASK_LOAD_FAILED));
                false
            }
        }
    }

    /// The task as last loaded or saved.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        self.loaded.as_ref()
    }

    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Updates one field and revalidates it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FieldNotEditable`] for [`TaskField::User`].
    pub fn set_field(&mut self, field: TaskField, value: &str) -> Result<Option<&str>, FormError> {
        let slot = self
            .input
            .field_mut(field)
            .ok_or(FormError::FieldNotEditable(field))?;
        *slot = value.to_string();
        let message = check_task_edit_field(&self.input, field);
        self.errors.set(field, message.map(str::to_string));
        Ok(self.errors.get(field))
    }

    #[must_use]
    pub const fn input(&self) -> &TaskEditInput {
        &self.input
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<TaskField> {
        &self.errors
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.lifecycle.state()
    }

    #[must_use]
    pub const fn caption(&self) -> &'static str {
        self.lifecycle.caption()
    }

    /// Validates the fields and issues one `PATCH /task/{id}`.
    ///
    /// On success the fields are refreshed from the saved task and the form
    /// asks to navigate back to the board.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotLoaded`] before a successful [`load`](Self::load),
    /// or [`FormError::AlreadySubmitting`] if a submission is in flight.
    pub async fn submit(&mut self) -> Result<SubmitOutcome<TaskField, Task>, FormError> {
        self.lifecycle.ensure_idle()?;
        if self.loaded.is_none() {
            return Err(FormError::NotLoaded);
        }

        let patch = match validate_task_edit(&self.input) {
            Ok(patch) => patch,
            Err(errors) => {
                self.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        self.errors = FieldErrors::new();

        self.lifecycle.begin();
        match self.api.update_task(self.task_id, &patch).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task updated");
                self.input = TaskEditInput::from(&task);
                self.loaded = Some(task.clone());
                self.lifecycle
                    .succeed(Acknowledgment::success(feedback::TASK_UPDATED), true);
                Ok(SubmitOutcome::Submitted(task))
            }
            Err(e) => {
                tracing::warn!(task_id = %self.task_id, error = %e, "task update failed");
                let ack = Acknowledgment::from_api_error(&e);
                self.lifecycle.fail(ack.clone());
                Ok(SubmitOutcome::Failed(ack))
            }
        }
    }

    /// Discards edits, restoring the loaded values, and forces the form back
    /// to idle.
    pub fn reset(&mut self) {
        self.input = self
            .loaded
            .as_ref()
            .map(TaskEditInput::from)
            .unwrap_or_default();
        self.errors = FieldErrors::new();
        self.lifecycle.reset();
    }
}
