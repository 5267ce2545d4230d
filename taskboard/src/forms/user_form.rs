//! User registration form.

use taskboard_proto::user::User;
use tokio::sync::mpsc;

use super::{FormError, FormEvent, FormKind, FormSettings, FormState, Lifecycle, SubmitOutcome};
use crate::api::Collaborator;
use crate::feedback::{self, Acknowledgment};
use crate::validation::{
    FieldErrors, UserField, UserInput, check_user_field, phone_mask, steer_email, steer_name,
    validate_user,
};

/// Controller for the user registration form.
pub struct UserForm<C: Collaborator> {
    api: C,
    input: UserInput,
    errors: FieldErrors<UserField>,
    navigate_after_submit: bool,
    lifecycle: Lifecycle,
}

impl<C: Collaborator> UserForm<C> {
    /// Creates an empty form and the receiver for its [`FormEvent`]s.
    pub fn new(api: C, settings: &FormSettings) -> (Self, mpsc::Receiver<FormEvent>) {
        let (lifecycle, event_rx) = Lifecycle::new(FormKind::User, settings.event_buffer);
        let form = Self {
            api,
            input: UserInput::default(),
            errors: FieldErrors::new(),
            navigate_after_submit: settings.navigate_after_submit,
            lifecycle,
        };
        (form, event_rx)
    }

    /// Steers a typed value into shape, stores it and revalidates the field.
    ///
    /// Names keep only letters and single spaces, emails are trimmed, phones
    /// are masked. Returns the field's current error, if any.
    pub fn set_field(&mut self, field: UserField, value: &str) -> Option<&str> {
        let steered = match field {
            UserField::Name => steer_name(value),
            UserField::Email => steer_email(value),
            UserField::Phone => phone_mask(value),
        };
        *self.input.field_mut(field) = steered;
        let message = check_user_field(&self.input, field);
        self.errors.set(field, message.map(str::to_string));
        self.errors.get(field)
    }

    /// Field values as steered so far.
    #[must_use]
    pub const fn input(&self) -> &UserInput {
        &self.input
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<UserField> {
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

    /// Validates the form and, if valid, issues exactly one `POST /user/`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadySubmitting`] if a submission is in flight.
    pub async fn submit(&mut self) -> Result<SubmitOutcome<UserField, User>, FormError> {
        self.lifecycle.ensure_idle()?;

        let new_user = match validate_user(&self.input) {
            Ok(new_user) => new_user,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "user form has validation errors");
                self.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        self.errors = FieldErrors::new();

        self.lifecycle.begin();
        match self.api.create_user(&new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user registered");
                self.input = UserInput::default();
                self.lifecycle.succeed(
                    Acknowledgment::success(feedback::USER_CREATED),
                    self.navigate_after_submit,
                );
                Ok(SubmitOutcome::Submitted(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "user registration failed");
                let ack = Acknowledgment::from_api_error(&e);
                self.lifecycle.fail(ack.clone());
                Ok(SubmitOutcome::Failed(ack))
            }
        }
    }

    /// Clears the fields and errors and forces the form back to idle.
    pub fn reset(&mut self) {
        self.input = UserInput::default();
        self.errors = FieldErrors::new();
        self.lifecycle.reset();
    }
}
