//! Deterministic text normalization applied before storage and comparison.
//!
//! Normalization always runs before uniqueness checks so that, for example,
//! `"bio101"` and `"BIO101"` collide as the same course title.

use anyhow::anyhow;

use crate::errors::AppError;

/// Trims surrounding whitespace and returns `None` when nothing is left.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Title-cases `value` after trimming it.
///
/// A letter is upper-cased when the character before it is not a letter and
/// lower-cased otherwise, so digits and punctuation start a new word:
/// `"bio101"` becomes `"Bio101"` and `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_letter = false;

    for ch in value.trim().chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}

pub fn upper_case(value: &str) -> String {
    value.trim().to_uppercase()
}

pub fn lower_case(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Rejects a normalized value longer than `max` characters.
///
/// Case folding can lengthen text (`"ß"` upper-cases to `"SS"`), so limits
/// are checked on the normalized value rather than on the raw input.
pub fn max_length(field: &str, value: String, max: usize) -> Result<String, AppError> {
    if value.chars().count() > max {
        return Err(AppError::invalid_field(anyhow!(
            "{} must be at most {} characters",
            field,
            max
        )));
    }
    Ok(value)
}

/// Splits a comma separated list, dropping blank entries and duplicates
/// (after `normalize`) while keeping the first-seen order.
pub fn split_list<F>(raw: &str, normalize: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut seen = Vec::new();
    for item in raw.split(',').filter_map(non_blank) {
        let item = normalize(item);
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
