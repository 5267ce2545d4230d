//! Declarative validation schemas for the task and user forms.
//!
//! Each schema is a pure function `validate(&Input) -> Result<Record,
//! FieldErrors<Field>>`. Every field is checked (validate-all), but within a
//! field only the first failing rule is reported.

pub mod normalize;
pub mod task;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;

pub use normalize::{
    capitalize_words, collapse_whitespace, lower_trim, phone_mask, steer_email, steer_name,
};
pub use task::{
    TaskDraft, TaskEditInput, TaskField, TaskInput, check_task_edit_field, check_task_field,
    validate_task, validate_task_edit,
};
pub use user::{UserField, UserInput, check_user_field, validate_user};

/// A single constraint: a predicate and the message shown when it fails.
#[derive(Clone, Copy)]
pub struct Rule {
    check: fn(&str) -> bool,
    message: &'static str,
}

impl Rule {
    /// Builds a rule from a predicate and its user-facing message.
    #[must_use]
    pub const fn new(check: fn(&str) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }

    /// The message reported when this rule fails.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// Runs rules in order and returns the message of the first one that fails.
///
/// # Errors
///
/// Returns the failing rule's message.
pub fn first_failing(value: &str, rules: &[Rule]) -> Result<(), &'static str> {
    match rules.iter().find(|rule| !(rule.check)(value)) {
        Some(rule) => Err(rule.message),
        None => Ok(()),
    }
}

/// Number of characters (not bytes) in `s`.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Per-field error messages collected by a schema.
///
/// Holds at most one message per field; the first one recorded wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one field's rule chain.
    ///
    /// Returns the normalized value on success. On failure the message is
    /// stored (unless the field already has one) and `None` is returned.
    pub fn record<T>(&mut self, field: F, outcome: Result<T, &'static str>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors
                    .entry(field)
                    .or_insert_with(|| message.to_string());
                None
            }
        }
    }

    /// Replaces the message for one field, or clears it with `None`.
    pub fn set(&mut self, field: F, message: Option<String>) {
        match message {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Returns the message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Returns `true` if the field has an error.
    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.errors.contains_key(&field)
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over failed fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl<F: Ord + Copy + fmt::Display> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}
