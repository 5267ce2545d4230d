//! Task registration and task edit schemas.

use std::fmt;

use chrono::NaiveDate;
use taskboard_proto::task::{
    MAX_DESCRIPTION_LENGTH, MAX_NAME_CLASS_LENGTH, NewTask, Task, TaskPatch, TaskPriority,
    TaskStatus,
};
use taskboard_proto::user::UserId;

use super::normalize::{capitalize_words, collapse_whitespace};
use super::{FieldErrors, Rule, char_len, first_failing};

pub const DESCRIPTION_REQUIRED: &str = "Descrição é obrigatória";
pub const DESCRIPTION_TOO_LONG: &str = "Máximo 255 caracteres";
pub const NAME_CLASS_REQUIRED: &str = "Nome do setor é obrigatório";
pub const NAME_CLASS_TOO_LONG: &str = "Máximo 15 caracteres";
pub const PRIORITY_INVALID: &str = "Prioridade inválida: use low, mid ou high";
pub const STATUS_INVALID: &str = "Status inválido: use todo, in_progress ou done";
pub const USER_REQUIRED: &str = "Selecione um usuário";
pub const USER_INVALID: &str = "Usuário inválido";

const DESCRIPTION_RULES: &[Rule] = &[
    Rule::new(is_not_blank, DESCRIPTION_REQUIRED),
    Rule::new(fits_description, DESCRIPTION_TOO_LONG),
];

// Applied to the trimmed value.
const NAME_CLASS_RULES: &[Rule] = &[
    Rule::new(is_not_blank, NAME_CLASS_REQUIRED),
    Rule::new(fits_name_class, NAME_CLASS_TOO_LONG),
];

fn is_not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

fn fits_description(s: &str) -> bool {
    char_len(s) <= MAX_DESCRIPTION_LENGTH
}

fn fits_name_class(s: &str) -> bool {
    char_len(s) <= MAX_NAME_CLASS_LENGTH
}

/// Fields of the task forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskField {
    Description,
    NameClass,
    Priority,
    Status,
    User,
}

impl TaskField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::NameClass => "name_class",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::User => "user",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values of the task registration form, exactly as entered.
///
/// `user` is the selector's value: an id rendered as text, or empty when
/// nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub description: String,
    pub name_class: String,
    pub priority: String,
    pub status: String,
    pub user: String,
}

impl TaskInput {
    /// Mutable access to one field's raw value.
    pub fn field_mut(&mut self, field: TaskField) -> &mut String {
        match field {
            TaskField::Description => &mut self.description,
            TaskField::NameClass => &mut self.name_class,
            TaskField::Priority => &mut self.priority,
            TaskField::Status => &mut self.status,
            TaskField::User => &mut self.user,
        }
    }
}

/// Raw values of the task edit form. The owner cannot be changed there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEditInput {
    pub description: String,
    pub name_class: String,
    pub priority: String,
    pub status: String,
}

impl TaskEditInput {
    /// Mutable access to one field's raw value; `None` for [`TaskField::User`].
    pub fn field_mut(&mut self, field: TaskField) -> Option<&mut String> {
        match field {
            TaskField::Description => Some(&mut self.description),
            TaskField::NameClass => Some(&mut self.name_class),
            TaskField::Priority => Some(&mut self.priority),
            TaskField::Status => Some(&mut self.status),
            TaskField::User => None,
        }
    }
}

impl From<&Task> for TaskEditInput {
    fn from(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            name_class: task.name_class.clone(),
            priority: task.priority.as_str().to_string(),
            status: task.status.as_str().to_string(),
        }
    }
}

/// A validated, normalized task that still lacks its creation stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub name_class: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub user: UserId,
}

impl TaskDraft {
    /// Stamps the draft with its creation date, producing the `POST` body.
    #[must_use]
    pub fn into_new_task(self, register_date: NaiveDate) -> NewTask {
        NewTask {
            description: self.description,
            name_class: self.name_class,
            priority: self.priority,
            status: self.status,
            user: self.user,
            register_date,
        }
    }
}

/// Validates and normalizes the task registration form.
///
/// # Errors
///
/// Returns one message per failing field.
pub fn validate_task(input: &TaskInput) -> Result<TaskDraft, FieldErrors<TaskField>> {
    let mut errors = FieldErrors::new();
    let description = errors.record(TaskField::Description, description(&input.description));
    let name_class = errors.record(TaskField::NameClass, name_class(&input.name_class));
    let priority = errors.record(TaskField::Priority, priority(&input.priority));
    let status = errors.record(TaskField::Status, status(&input.status));
    let user = errors.record(TaskField::User, user(&input.user));

    match (description, name_class, priority, status, user) {
        (Some(description), Some(name_class), Some(priority), Some(status), Some(user)) => {
            Ok(TaskDraft {
                description,
                name_class,
                priority,
                status,
                user,
            })
        }
        _ => Err(errors),
    }
}

/// Validates and normalizes the task edit form into a full patch.
///
/// Uses the same per-field rules as [`validate_task`].
///
/// # Errors
///
/// Returns one message per failing field.
pub fn validate_task_edit(input: &TaskEditInput) -> Result<TaskPatch, FieldErrors<TaskField>> {
    let mut errors = FieldErrors::new();
    let description = errors.record(TaskField::Description, description(&input.description));
    let name_class = errors.record(TaskField::NameClass, name_class(&input.name_class));
    let priority = errors.record(TaskField::Priority, priority(&input.priority));
    let status = errors.record(TaskField::Status, status(&input.status));

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(TaskPatch {
        description,
        name_class,
        priority,
        status,
    })
}

/// Validates a single field of the registration form, for live feedback.
#[must_use]
pub fn check_task_field(input: &TaskInput, field: TaskField) -> Option<&'static str> {
    match field {
        TaskField::Description => description(&input.description).err(),
        TaskField::NameClass => name_class(&input.name_class).err(),
        TaskField::Priority => priority(&input.priority).err(),
        TaskField::Status => status(&input.status).err(),
        TaskField::User => user(&input.user).err(),
    }
}

/// Validates a single field of the edit form. The owner is not editable, so
/// [`TaskField::User`] never fails here.
#[must_use]
pub fn check_task_edit_field(input: &TaskEditInput, field: TaskField) -> Option<&'static str> {
    match field {
        TaskField::Description => description(&input.description).err(),
        TaskField::NameClass => name_class(&input.name_class).err(),
        TaskField::Priority => priority(&input.priority).err(),
        TaskField::Status => status(&input.status).err(),
        TaskField::User => None,
    }
}

fn description(raw: &str) -> Result<String, &'static str> {
    first_failing(raw, DESCRIPTION_RULES)?;
    Ok(collapse_whitespace(raw))
}

fn name_class(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    first_failing(trimmed, NAME_CLASS_RULES)?;
    Ok(capitalize_words(trimmed))
}

fn priority(raw: &str) -> Result<TaskPriority, &'static str> {
    raw.parse().map_err(|_| PRIORITY_INVALID)
}

fn status(raw: &str) -> Result<TaskStatus, &'static str> {
    raw.parse().map_err(|_| STATUS_INVALID)
}

fn user(raw: &str) -> Result<UserId, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(USER_REQUIRED);
    }
    trimmed
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(UserId::new)
        .ok_or(USER_INVALID)
}
