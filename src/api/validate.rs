//! Input checks shared by the API handlers.

use crate::http::error::AppError;
use crate::store::normalize_phone;

const MAX_NAME_CHARS: usize = 100;
const MAX_MESSAGE_CHARS: usize = 2000;

/// Trimmed display name, 1 to 100 characters.
pub fn name(input: &str) -> Result<String, AppError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::BadRequest("name is too long".into()));
    }
    Ok(name.to_string())
}

/// Phone number with separators removed: optional `+`, then 8 to 15 digits.
pub fn phone(input: &str) -> Result<String, AppError> {
    let compact = normalize_phone(input);

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let valid = (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(AppError::BadRequest("phone number is invalid".into()));
    }
    Ok(compact)
}

pub fn message(input: &str) -> Result<String, AppError> {
    let message = input.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::BadRequest("message is too long".into()));
    }
    Ok(message.to_string())
}
