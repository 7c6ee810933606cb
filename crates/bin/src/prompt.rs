//! Interactive prompting collaborators.
//!
//! Flag values bypass the prompt but are validated the same way, so the core
//! only ever sees values that passed the boundary here.

use dialoguer::{Confirm, Input, Password};
use sherry::validate::ValidationError;
use sherry::Result;

fn io_error(error: dialoguer::Error) -> sherry::Error {
    sherry::Error::Io(std::io::Error::other(error.to_string()))
}

fn invalid(field: &str, value: &str) -> sherry::Error {
    ValidationError::Malformed {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Use `value` when given, otherwise prompt until `valid` accepts the input.
pub fn input(field: &str, value: &str, valid: impl Fn(&str) -> bool + Clone) -> Result<String> {
    if value.is_empty() {
        let entered: String = Input::new()
            .with_prompt(field)
            .validate_with(move |text: &String| {
                if valid(text) {
                    Ok(())
                } else {
                    Err("invalid value")
                }
            })
            .interact_text()
            .map_err(io_error)?;
        return Ok(entered);
    }
    if !valid(value) {
        return Err(invalid(field, value));
    }
    Ok(value.to_string())
}

/// Like [`input`], but allows submitting an empty value (meaning "use the
/// default").
pub fn input_optional(
    field: &str,
    help: &str,
    valid: impl Fn(&str) -> bool + Clone,
) -> Result<String> {
    let prompt = if help.is_empty() {
        field.to_string()
    } else {
        format!("{field} ({help})")
    };
    let entered: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(move |text: &String| {
            if text.is_empty() || valid(text) {
                Ok(())
            } else {
                Err("invalid value")
            }
        })
        .interact_text()
        .map_err(io_error)?;
    Ok(entered)
}

/// Hidden input for secrets.
pub fn password(field: &str, value: &str, valid: impl Fn(&str) -> bool) -> Result<String> {
    if value.is_empty() {
        let entered = Password::new()
            .with_prompt(field)
            .interact()
            .map_err(io_error)?;
        if !valid(&entered) {
            return Err(invalid(field, &entered));
        }
        return Ok(entered);
    }
    if !valid(value) {
        return Err(invalid(field, value));
    }
    Ok(value.to_string())
}

pub fn confirm(question: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(default)
        .interact()
        .map_err(io_error)
}
