//! User validation

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("User ID can only contain alphanumeric characters and hyphens")]
    InvalidIdCharacters,

    #[error("User name cannot be empty")]
    EmptyName,

    #[error("User email is not valid")]
    InvalidEmail,
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID (UUID strings satisfy this)
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(UserValidationError::InvalidIdCharacters);
    }

    Ok(())
}

/// Validate a user display name
pub fn validate_user_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    Ok(())
}

/// Minimal email shape check, the mail system is the real validator
pub fn validate_user_email(email: &str) -> Result<(), UserValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::InvalidEmail);
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}
