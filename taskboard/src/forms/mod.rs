//! Form submission controllers.
//!
//! Each form runs the same pipeline: validate, normalize, submit, then turn
//! the collaborator's answer into an [`Acknowledgment`]. A form moves through
//! `Idle -> Submitting -> (Success | Failed) -> Idle`; the intermediate
//! states are observable as [`FormEvent`]s on a bounded channel.
//!
//! Submissions are serialized per form: `submit` takes `&mut self`, and a
//! submit issued while the form is still `Submitting` (for example after a
//! cancelled future) is refused with [`FormError::AlreadySubmitting`].

pub mod edit_form;
pub mod task_form;
pub mod user_form;

use std::fmt;

use tokio::sync::mpsc;

use crate::feedback::Acknowledgment;
use crate::validation::{FieldErrors, TaskField};

pub use edit_form::TaskEditForm;
pub use task_form::TaskForm;
pub use user_form::UserForm;

/// Caption of the trigger while a submission is in flight.
pub const SUBMITTING_CAPTION: &str = "Enviando...";

/// Default capacity of a form's event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Errors from misusing a form controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    AlreadySubmitting,

    /// The edit form was submitted before its task was loaded.
    #[error("no task loaded")]
    NotLoaded,

    /// The field cannot be changed on this form.
    #[error("field {0} cannot be edited")]
    FieldNotEditable(TaskField),
}

/// Submission state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Which form an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Task,
    User,
    TaskEdit,
}

impl FormKind {
    /// Caption of the submit trigger when the form is idle.
    #[must_use]
    pub const fn idle_caption(self) -> &'static str {
        match self {
            Self::Task => "Cadastrar Task",
            Self::User => "Cadastrar Usuário",
            Self::TaskEdit => "Salvar Alterações",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::User => write!(f, "user"),
            Self::TaskEdit => write!(f, "task-edit"),
        }
    }
}

/// Navigation targets a form can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
}

/// Events emitted by form controllers for the host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The form's submission state changed.
    StateChanged { form: FormKind, state: FormState },
    /// A one-shot message for the user.
    Acknowledged { form: FormKind, ack: Acknowledgment },
    /// The form asks the host to switch views.
    Navigate { form: FormKind, view: View },
}

/// Result of a submit that was allowed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<F: Ord, T> {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors<F>),
    /// The collaborator accepted the record.
    Submitted(T),
    /// The collaborator call failed; the acknowledgment was emitted.
    Failed(Acknowledgment),
}

impl<F: Ord, T> SubmitOutcome<F, T> {
    /// Returns `true` if the record was accepted.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Tunables shared by all form controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// Capacity of the event channel.
    pub event_buffer: usize,
    /// Whether the create forms ask to show the board after a success.
    pub navigate_after_submit: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
            navigate_after_submit: false,
        }
    }
}

/// Submission state machine plus event emission, shared by the forms.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    kind: FormKind,
    state: FormState,
    event_tx: mpsc::Sender<FormEvent>,
}

impl Lifecycle {
    pub(crate) fn new(kind: FormKind, event_buffer: usize) -> (Self, mpsc::Receiver<FormEvent>) {
        let (event_tx, event_rx) = mpsc::channel(event_buffer.max(1));
        let lifecycle = Self {
            kind,
            state: FormState::Idle,
            event_tx,
        };
        (lifecycle, event_rx)
    }

    pub(crate) const fn state(&self) -> FormState {
        self.state
    }

    pub(crate) const fn caption(&self) -> &'static str {
        match self.state {
            FormState::Submitting => SUBMITTING_CAPTION,
            _ => self.kind.idle_caption(),
        }
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        Ok(())
    }

    pub(crate) fn begin(&mut self) {
        self.transition(FormState::Submitting);
    }

    /// Success: acknowledge, optionally navigate, return to idle.
    pub(crate) fn succeed(&mut self, ack: Acknowledgment, navigate: bool) {
        self.transition(FormState::Success);
        self.acknowledge(ack);
        if navigate {
            self.emit(FormEvent::Navigate {
                form: self.kind,
                view: View::Board,
            });
        }
        self.transition(FormState::Idle);
    }

    /// Failure: acknowledge, return to idle.
    pub(crate) fn fail(&mut self, ack: Acknowledgment) {
        self.transition(FormState::Failed);
        self.acknowledge(ack);
        self.transition(FormState::Idle);
    }

    pub(crate) fn acknowledge(&self, ack: Acknowledgment) {
        self.emit(FormEvent::Acknowledged {
            form: self.kind,
            ack,
        });
    }

    pub(crate) fn reset(&mut self) {
        if self.state != FormState::Idle {
            self.transition(FormState::Idle);
        }
    }

    fn transition(&mut self, state: FormState) {
        tracing::trace!(form = %self.kind, from = ?self.state, to = ?state, "form state");
        self.state = state;
        self.emit(FormEvent::StateChanged {
            form: self.kind,
            state,
        });
    }

    // A full channel or a dropped receiver only loses UI notifications.
    fn emit(&self, event: FormEvent) {
        let _ = self.event_tx.try_send(event);
    }
}
