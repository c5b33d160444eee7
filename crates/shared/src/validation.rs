//! Common validation utilities.

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use validator::ValidationError;

/// Characters that count as "special" for password strength.
pub const PASSWORD_SPECIAL_CHARS: &str = "@#$%^&+=";

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static::lazy_static! {
    /// E.164-style phone number: optional '+', no leading zero, 2-15 digits.
    pub static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// Password must be at least 8 characters with a digit, a lowercase and an
/// uppercase letter, one of `@#$%^&+=`, and no whitespace.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    let no_whitespace = !password.chars().any(char::is_whitespace);

    if long_enough && has_digit && has_lower && has_upper && has_special && no_whitespace {
        Ok(())
    } else {
        Err(error(
            "password_strength",
            "Password must be at least 8 characters long and contain at least one digit, \
             one lowercase letter, one uppercase letter, and one special character",
        ))
    }
}

/// Validates a phone number against [`PHONE_REGEX`].
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(error("phone_format", "Invalid phone number format"))
    }
}

/// Validates that a string is a hyphenated UUID.
pub fn validate_uuid_string(value: &str) -> Result<(), ValidationError> {
    match uuid::Uuid::parse_str(value) {
        Ok(_) if value.len() == 36 => Ok(()),
        _ => Err(error("uuid_format", "Value must be a valid UUID")),
    }
}

/// Validates that an instant lies strictly after `now`.
pub fn validate_future(value: &DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > now {
        Ok(())
    } else {
        Err(error("future", "Date must be in the future"))
    }
}
