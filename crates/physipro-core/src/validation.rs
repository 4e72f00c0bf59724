//! Field rules for user input.
//!
//! The predicates here are used both directly by the services and through
//! the `validator` derive (`#[validate(custom(function = ...))]`) on request
//! DTOs. [`validate_dto`] turns derive failures into a single
//! `VALIDATION_ERROR`.

use std::borrow::Cow;

use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const CPF_DIGITS: usize = 11;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    // `ValidateEmail` accepts dotless domains such as `user@localhost`.
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
}

/// Strips punctuation, keeping only ASCII digits.
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accepts `ddd.ddd.ddd-dd` (separators optional) or eleven bare digits.
/// Check digits are not verified.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let cpf = cpf.trim();
    if !cpf.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return false;
    }

    let digits = normalize_cpf(cpf);
    if digits.len() != CPF_DIGITS {
        return false;
    }

    if cpf.len() == CPF_DIGITS {
        return true;
    }

    // Punctuated form: separators may only sit after digit 3, 6 and 9.
    let mut seen = 0;
    for c in cpf.chars() {
        match c {
            '.' if seen == 3 || seen == 6 => {}
            '-' if seen == 9 => {}
            '.' | '-' => return false,
            _ => seen += 1,
        }
    }
    true
}

/// At least eight characters with one ASCII letter and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len)
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(rule_error(
            "name",
            "Name must be between 3 and 100 characters",
        ))
    }
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(rule_error("email", "Invalid email format"))
    }
}

pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(cpf) {
        Ok(())
    } else {
        Err(rule_error("cpf", "CPF must contain 11 digits"))
    }
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(rule_error(
            "password",
            "Password must be at least 8 characters long and contain at least one letter and one number",
        ))
    }
}

/// Joins every field error into one message, ordered by field name.
pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_dto<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate()
        .map_err(|errors| AppError::validation(format_errors(&errors)))
}
