//! User registration schema.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use taskboard_proto::user::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, NewUser};

use super::normalize::{capitalize_words, lower_trim};
use super::{FieldErrors, Rule, char_len, first_failing};

pub const NAME_REQUIRED: &str = "Nome é obrigatório";
pub const NAME_TOO_LONG: &str = "Máximo 30 caracteres";
pub const NAME_SHAPE: &str = "Digite nome completo (nome e sobrenome), sem números ou símbolos, sem espaços no início/fim";
pub const NAME_PARTS: &str = "Digite pelo menos nome e sobrenome";
pub const NAME_PART_LENGTH: &str = "Cada parte do nome deve ter pelo menos 2 letras";
pub const EMAIL_REQUIRED: &str = "Email é obrigatório";
pub const EMAIL_TOO_LONG: &str = "Máximo 50 caracteres";
pub const EMAIL_SHAPE: &str = "Formato de email inválido";
pub const EMAIL_DISPOSABLE: &str = "Emails temporários não são permitidos";
pub const EMAIL_DOMAIN: &str = "Use apenas email válido (@gmail, @hotmail ou @empresa.com.br)";
pub const PHONE_SHORT: &str = "Telefone incompleto";
pub const PHONE_LONG: &str = "Telefone inválido";
pub const PHONE_SHAPE: &str = "Telefone inválido, use o formato (xx) xxxxx-xxxx";

const DISPOSABLE_MARKERS: &[&str] = &["tempmail", "mailinator"];
const ALLOWED_DOMAINS: &[&str] = &["@gmail.com", "@hotmail.com", "@empresa.com.br"];

const MIN_PHONE_LENGTH: usize = 14;
const MAX_PHONE_LENGTH: usize = super::normalize::MAX_PHONE_LENGTH;

#[allow(clippy::expect_used)]
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ]+(?: [A-Za-zÀ-ÖØ-öø-ÿ]+)+$").expect("name pattern is valid")
});

// Lookarounds are unsupported, so the leading-dot and double-dot cases are
// handled in `is_structural_email`.
#[allow(clippy::expect_used)]
static EMAIL_STRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email structure pattern is valid")
});

#[allow(clippy::expect_used)]
static EMAIL_SIMPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[allow(clippy::expect_used)]
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\([0-9]{2}\) [0-9]{4,5}-[0-9]{4}$").expect("phone pattern is valid")
});

const NAME_RULES: &[Rule] = &[
    Rule::new(is_present, NAME_REQUIRED),
    Rule::new(fits_name, NAME_TOO_LONG),
    Rule::new(is_full_name, NAME_SHAPE),
];

// Checked on the capitalized name.
const NAME_PART_RULES: &[Rule] = &[
    Rule::new(has_two_parts, NAME_PARTS),
    Rule::new(parts_are_long_enough, NAME_PART_LENGTH),
];

// Applied to the trimmed, lower-cased address.
const EMAIL_RULES: &[Rule] = &[
    Rule::new(is_present, EMAIL_REQUIRED),
    Rule::new(fits_email, EMAIL_TOO_LONG),
    Rule::new(is_structural_email, EMAIL_SHAPE),
    Rule::new(is_simple_email, EMAIL_SHAPE),
    Rule::new(is_not_disposable, EMAIL_DISPOSABLE),
    Rule::new(has_allowed_domain, EMAIL_DOMAIN),
];

const PHONE_RULES: &[Rule] = &[
    Rule::new(phone_not_short, PHONE_SHORT),
    Rule::new(phone_not_long, PHONE_LONG),
    Rule::new(is_masked_phone, PHONE_SHAPE),
];

fn is_present(s: &str) -> bool {
    !s.is_empty()
}

fn fits_name(s: &str) -> bool {
    char_len(s) <= MAX_NAME_LENGTH
}

fn is_full_name(s: &str) -> bool {
    NAME_PATTERN.is_match(s)
}

fn has_two_parts(s: &str) -> bool {
    s.split(' ').count() >= 2
}

fn parts_are_long_enough(s: &str) -> bool {
    s.split(' ').all(|part| char_len(part) >= 2)
}

fn fits_email(s: &str) -> bool {
    char_len(s) <= MAX_EMAIL_LENGTH
}

fn is_structural_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL_STRUCTURE.is_match(s)
}

fn is_simple_email(s: &str) -> bool {
    EMAIL_SIMPLE.is_match(s)
}

fn is_not_disposable(s: &str) -> bool {
    !DISPOSABLE_MARKERS.iter().any(|marker| s.contains(marker))
}

fn has_allowed_domain(s: &str) -> bool {
    ALLOWED_DOMAINS.iter().any(|domain| s.ends_with(domain))
}

fn phone_not_short(s: &str) -> bool {
    char_len(s) >= MIN_PHONE_LENGTH
}

fn phone_not_long(s: &str) -> bool {
    char_len(s) <= MAX_PHONE_LENGTH
}

fn is_masked_phone(s: &str) -> bool {
    PHONE_PATTERN.is_match(s)
}

/// Fields of the user registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Name,
    Email,
    Phone,
}

impl UserField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values of the user registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UserInput {
    /// Mutable access to one field's raw value.
    pub fn field_mut(&mut self, field: UserField) -> &mut String {
        match field {
            UserField::Name => &mut self.name,
            UserField::Email => &mut self.email,
            UserField::Phone => &mut self.phone,
        }
    }
}

/// Validates and normalizes the user registration form.
///
/// # Errors
///
/// Returns one message per failing field.
pub fn validate_user(input: &UserInput) -> Result<NewUser, FieldErrors<UserField>> {
    let mut errors = FieldErrors::new();
    let name = errors.record(UserField::Name, name(&input.name));
    let email = errors.record(UserField::Email, email(&input.email));
    let phone = errors.record(UserField::Phone, phone(&input.phone));

    match (name, email, phone) {
        (Some(name), Some(email), Some(phone)) => Ok(NewUser {
            name,
            email,
            phone: Some(phone),
        }),
        _ => Err(errors),
    }
}

/// Validates a single field, for live feedback.
#[must_use]
pub fn check_user_field(input: &UserInput, field: UserField) -> Option<&'static str> {
    match field {
        UserField::Name => name(&input.name).err(),
        UserField::Email => email(&input.email).err(),
        UserField::Phone => phone(&input.phone).err(),
    }
}

fn name(raw: &str) -> Result<String, &'static str> {
    first_failing(raw, NAME_RULES)?;
    let name = capitalize_words(raw);
    first_failing(&name, NAME_PART_RULES)?;
    Ok(name)
}

fn email(raw: &str) -> Result<String, &'static str> {
    let email = lower_trim(raw);
    first_failing(&email, EMAIL_RULES)?;
    Ok(email)
}

fn phone(raw: &str) -> Result<String, &'static str> {
    first_failing(raw, PHONE_RULES)?;
    Ok(raw.to_string())
}
