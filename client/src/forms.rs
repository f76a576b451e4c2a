//! Input checks run before a form is submitted.

use common::requests::{HabitPayload, LoginRequest, RegisterRequest};

use crate::error::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    if blank(email) || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Checks are ordered: missing fields, then mismatch, then length.
pub fn validate_register(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RegisterRequest, ValidationError> {
    if blank(username) || blank(email) || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(RegisterRequest {
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// An empty description is sent as absent; an empty frequency falls back to
/// `daily`.
pub fn validate_habit(
    name: &str,
    description: &str,
    frequency: &str,
) -> Result<HabitPayload, ValidationError> {
    if blank(name) {
        return Err(ValidationError::MissingHabitName);
    }
    let description = Some(description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    let frequency = match frequency.trim() {
        "" => "daily".to_string(),
        other => other.to_string(),
    };
    Ok(HabitPayload {
        name: name.trim().to_string(),
        description,
        frequency,
    })
}
