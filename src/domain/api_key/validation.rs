//! API key validation

use thiserror::Error;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key ID must be of the form '<prefix>.<hash>'")]
    InvalidIdFormat,

    #[error("API key ID segments can only contain alphanumeric characters")]
    InvalidIdCharacters,

    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_KEY_NAME_LENGTH: usize = 128;

/// Validate an API key storage identifier (`<prefix>.<hash-of-presented-key>`)
pub fn validate_api_key_id(id: &str) -> Result<(), ApiKeyValidationError> {
    let Some((prefix, hash)) = id.split_once('.') else {
        return Err(ApiKeyValidationError::InvalidIdFormat);
    };

    if prefix.is_empty() || hash.is_empty() || hash.contains('.') {
        return Err(ApiKeyValidationError::InvalidIdFormat);
    }

    if ![prefix, hash]
        .iter()
        .all(|part| part.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(ApiKeyValidationError::InvalidIdCharacters);
    }

    Ok(())
}

/// Validate an API key display name
pub fn validate_api_key_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if name.len() > MAX_KEY_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_KEY_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_api_key_id() {
        assert!(validate_api_key_id("a1b2c3d4.deadbeefcafe0123").is_ok());
        assert!(validate_api_key_id("XyZ09AbC.0f1e2d3c4b5a6978").is_ok());
    }

    #[test]
    fn test_invalid_api_key_id_format() {
        assert_eq!(
            validate_api_key_id("noseparator"),
            Err(ApiKeyValidationError::InvalidIdFormat)
        );
        assert_eq!(
            validate_api_key_id(".hashonly"),
            Err(ApiKeyValidationError::InvalidIdFormat)
        );
        assert_eq!(
            validate_api_key_id("prefixonly."),
            Err(ApiKeyValidationError::InvalidIdFormat)
        );
        assert_eq!(
            validate_api_key_id("a.b.c"),
            Err(ApiKeyValidationError::InvalidIdFormat)
        );
    }

    #[test]
    fn test_invalid_api_key_id_characters() {
        assert_eq!(
            validate_api_key_id("pre_fix.deadbeef"),
            Err(ApiKeyValidationError::InvalidIdCharacters)
        );
        assert_eq!(
            validate_api_key_id("prefix.dead beef"),
            Err(ApiKeyValidationError::InvalidIdCharacters)
        );
    }

    #[test]
    fn test_valid_api_key_name() {
        assert!(validate_api_key_name("CI deploy key").is_ok());
    }

    #[test]
    fn test_invalid_api_key_name() {
        assert_eq!(
            validate_api_key_name(""),
            Err(ApiKeyValidationError::EmptyName)
        );
        assert_eq!(
            validate_api_key_name("   "),
            Err(ApiKeyValidationError::EmptyName)
        );
        assert_eq!(
            validate_api_key_name(&"a".repeat(129)),
            Err(ApiKeyValidationError::NameTooLong(128))
        );
    }
}
