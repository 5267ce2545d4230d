//! Pure field normalizers.
//!
//! Every function here is idempotent: `f(f(s)) == f(s)`. The same family is
//! used while the user types ("steer" transforms) and when a form is
//! submitted, so the two layers cannot drift apart.

use taskboard_proto::user::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};

/// Maximum length of a masked phone number, `(DD) DDDDD-DDDD`.
pub const MAX_PHONE_LENGTH: usize = 15;

/// Number of source digits the phone mask consumes.
const PHONE_DIGITS: usize = 11;

/// Title-cases every word and every hyphen-separated segment of a word.
///
/// Outer whitespace is trimmed and internal whitespace runs become a single
/// space. The first character of each segment is upper-cased unless its
/// upper-case form expands to several characters (`ß`), in which case it is
/// kept as-is.
#[must_use]
pub fn capitalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize_segment)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    let mut out = String::with_capacity(segment.len());
    out.push(head);
    out.push_str(&chars.as_str().to_lowercase());
    out
}

/// Trims outer whitespace and replaces every internal run of two or more
/// whitespace characters with one space.
///
/// A lone whitespace character (a single tab, say) is kept unchanged.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    let trimmed = s.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut run = String::new();
    for c in trimmed.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace_run(&mut out, &mut run);
        out.push(c);
    }
    flush_whitespace_run(&mut out, &mut run);
    out
}

fn flush_whitespace_run(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}

/// Formats raw phone input as `(DD) DDDDD-DDDD`.
///
/// Non-digits are dropped and at most 11 digits are used. One or two digits
/// produce a partial `(D` / `(DD`; no digits produce an empty string.
#[must_use]
pub fn phone_mask(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect();

    let masked = match digits.len() {
        0 => String::new(),
        1 | 2 => std::iter::once('(').chain(digits.iter().copied()).collect(),
        n => {
            let area: String = digits[..2].iter().collect();
            let prefix: String = digits[2..n.min(7)].iter().collect();
            let line: String = digits[n.min(7)..].iter().collect();
            format!("({area}) {prefix}-{line}")
        }
    };
    masked.chars().take(MAX_PHONE_LENGTH).collect()
}

/// Trims, then lower-cases. Canonical form of an email address.
#[must_use]
pub fn lower_trim(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Live filter for the full-name field.
///
/// Keeps only letters (ASCII and Latin-1 accented) and plain spaces,
/// squeezes space runs to one space and caps the result at 30 characters.
#[must_use]
pub fn steer_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars().filter(|c| is_name_letter(*c) || *c == ' ') {
        if c == ' ' {
            if in_run {
                continue;
            }
            in_run = true;
            out.push(' ');
        } else {
            in_run = false;
            out.push(c);
        }
    }
    out.chars().take(MAX_NAME_LENGTH).collect()
}

/// Live filter for the email field: trim and cap at 50 characters.
#[must_use]
pub fn steer_email(s: &str) -> String {
    let capped: String = s.trim().chars().take(MAX_EMAIL_LENGTH).collect();
    // The cut can expose inner whitespace at the end.
    capped.trim_end().to_string()
}

/// Letters accepted in person names: `A-Z`, `a-z` and the Latin-1 accented
/// ranges `À-Ö`, `Ø-ö`, `ø-ÿ`.
#[must_use]
pub const fn is_name_letter(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'À'..='Ö' | 'Ø'..='ö' | 'ø'..='ÿ')
}
