//! Data models for the interview-prep application.
//!
//! Field names serialize in camelCase to match the web client.

mod answer;
mod github_repo;
mod knowledge;
mod question;
mod review;
mod tech_note;
mod tech_stack;

pub use answer::*;
pub use github_repo::*;
pub use knowledge::*;
pub use question::*;
pub use review::*;
pub use tech_note::*;
pub use tech_stack::*;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// Current time as a fixed-width RFC 3339 string, so lexical order matches time order.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Treat empty strings from form submissions as absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ensure a required text field is not blank.
pub fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Ensure a supplied patch value for a required text field is not blank.
pub fn require_text_if_present(field: &str, value: Option<&String>) -> Result<(), AppError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

/// Ensure a score lies within 1..=5.
pub fn check_score(field: &str, value: i64) -> Result<(), AppError> {
    if !(1..=5).contains(&value) {
        return Err(AppError::Validation(format!(
            "{} must be between 1 and 5, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Ensure a counter is not negative.
pub fn check_non_negative(field: &str, value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Deserialize an optional value where `""` means absent.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Patch value for a nullable column: `None` when the key is absent,
/// `Some(None)` when the client sent `null`.
pub type Patch<T> = Option<Option<T>>;

/// Deserialize a [`Patch`] so that an explicit `null` is kept as a clear.
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize a [`Patch`] where both `null` and `""` clear the value.
pub fn nullable_empty_as_none<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    empty_as_none(deserializer).map(Some)
}

/// Overwrite a nullable field when the patch supplies it.
pub fn patch_field<T: Clone>(field: &mut Option<T>, value: &Patch<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

/// Overwrite a nullable text field when supplied; blank text clears it.
pub fn patch_text(field: &mut Option<String>, value: &Patch<String>) {
    if let Some(value) = value {
        *field = blank_to_none(value.clone());
    }
}
