//! Task registration form.

use chrono::{NaiveDate, Utc};
use taskboard_proto::task::Task;
use taskboard_proto::user::UserSummary;
use tokio::sync::mpsc;

use super::{FormError, FormEvent, FormKind, FormSettings, FormState, Lifecycle, SubmitOutcome};
use crate::api::Collaborator;
use crate::feedback::{self, Acknowledgment};
use crate::validation::{FieldErrors, TaskField, TaskInput, check_task_field, validate_task};

/// Source of the creation date stamped on new tasks.
pub type Clock = fn() -> NaiveDate;

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Controller for the task registration form.
///
/// Holds the raw field values, the live per-field errors and the user
/// selector. On success the fields are cleared; on failure they are kept.
pub struct TaskForm<C: Collaborator> {
    api: C,
    input: TaskInput,
    errors: FieldErrors<TaskField>,
    users: Vec<UserSummary>,
    clock: Clock,
    navigate_after_submit: bool,
    lifecycle: Lifecycle,
}

impl<C: Collaborator> TaskForm<C> {
    /// Creates an empty form and the receiver for its [`FormEvent`]s.
    pub fn new(api: C, settings: &FormSettings) -> (Self, mpsc::Receiver<FormEvent>) {
        let (lifecycle, event_rx) = Lifecycle::new(FormKind::Task, settings.event_buffer);
        let form = Self {
            api,
            input: TaskInput::default(),
            errors: FieldErrors::new(),
            users: Vec::new(),
            clock: utc_today,
            navigate_after_submit: settings.navigate_after_submit,
            lifecycle,
        };
        (form, event_rx)
    }

    /// Replaces the date source used for `register_date`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fills the user selector from `GET /user/`.
    ///
    /// A failure is logged and leaves the selector empty.
    pub async fn load_users(&mut self) -> &[UserSummary] {
        match self.api.list_users().await {
            Ok(users) => {
                tracing::debug!(count = users.len(), "loaded user selector");
                self.users = users;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load users for the task form");
                self.users.clear();
            }
        }
        &self.users
    }

    /// Entries of the user selector.
    #[must_use]
    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    /// Updates one field and revalidates it. Returns the field's current
    /// error, if any.
    pub fn set_field(&mut self, field: TaskField, value: &str) -> Option<&str> {
        *self.input.field_mut(field) = value.to_string();
        let message = check_task_field(&self.input, field);
        self.errors.set(field, message.map(str::to_string));
        self.errors.get(field)
    }

    /// Raw field values.
    #[must_use]
    pub const fn input(&self) -> &TaskInput {
        &self.input
    }

    /// Current per-field errors.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<TaskField> {
        &self.errors
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.lifecycle.state()
    }

    /// Caption of the submit trigger.
    #[must_use]
    pub const fn caption(&self) -> &'static str {
        self.lifecycle.caption()
    }

    /// Returns `true` while the submit trigger is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.lifecycle.state() != FormState::Submitting
    }

    /// Validates the form and, if valid, issues exactly one `POST /task/`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadySubmitting`] if a submission is in flight.
    pub async fn submit(&mut self) -> Result<SubmitOutcome<TaskField, Task>, FormError> {
        self.lifecycle.ensure_idle()?;

        let draft = match validate_task(&self.input) {
            Ok(draft) => draft,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "task form has validation errors");
                self.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        self.errors = FieldErrors::new();

        self.lifecycle.begin();
        let new_task = draft.into_new_task((self.clock)());
        match self.api.create_task(&new_task).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task created");
                self.input = TaskInput::default();
                self.lifecycle.succeed(
                    Acknowledgment::success(feedback::TASK_CREATED),
                    self.navigate_after_submit,
                );
                Ok(SubmitOutcome::Submitted(task))
            }
            Err(e) => {
                tracing::warn!(error = %e, "task submission failed");
                let ack = Acknowledgment::from_api_error(&e);
                self.lifecycle.fail(ack.clone());
                Ok(SubmitOutcome::Failed(ack))
            }
        }
    }

    /// Clears the fields and errors and forces the form back to idle.
    pub fn reset(&mut self) {
        self.input = TaskInput::default();
        self.errors = FieldErrors::new();
        self.lifecycle.reset();
    }
}
