//! Shared validation for hierarchy identifiers and display names

use thiserror::Error;

/// Errors that can occur while validating hierarchy identifiers and names
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} ID cannot be empty")]
    EmptyId(&'static str),

    #[error("{0} ID cannot exceed {1} characters")]
    IdTooLong(&'static str, usize),

    #[error("{0} ID can only contain alphanumeric characters and hyphens")]
    InvalidIdCharacters(&'static str),

    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    #[error("{0} name cannot exceed {1} characters")]
    NameTooLong(&'static str, usize),
}

const MAX_ID_LENGTH: usize = 64;
const MAX_NAME_LENGTH: usize = 128;

/// Validate a hierarchy entity ID (UUID strings satisfy this)
pub fn validate_entity_id(kind: &'static str, id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId(kind));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(ValidationError::IdTooLong(kind, MAX_ID_LENGTH));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidIdCharacters(kind));
    }

    Ok(())
}

/// Validate a display name
pub fn validate_entity_name(kind: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName(kind));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong(kind, MAX_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_entity_id() {
        assert!(validate_entity_id("Organization", "my-org").is_ok());
        assert!(validate_entity_id("Team", "team123").is_ok());
        assert!(
            validate_entity_id("Department", "3f2b8c1a-9d8e-4f6a-b1c2-0d9e8f7a6b5c").is_ok()
        );
    }

    #[test]
    fn test_empty_entity_id() {
        assert_eq!(
            validate_entity_id("Organization", ""),
            Err(ValidationError::EmptyId("Organization"))
        );
    }

    #[test]
    fn test_entity_id_too_long() {
        let long_id = "a".repeat(65);
        assert_eq!(
            validate_entity_id("Team", &long_id),
            Err(ValidationError::IdTooLong("Team", 64))
        );
    }

    #[test]
    fn test_invalid_entity_id_characters() {
        assert_eq!(
            validate_entity_id("Team", "team_one"),
            Err(ValidationError::InvalidIdCharacters("Team"))
        );
        assert_eq!(
            validate_entity_id("Team", "team.one"),
            Err(ValidationError::InvalidIdCharacters("Team"))
        );
    }

    #[test]
    fn test_valid_entity_name() {
        assert!(validate_entity_name("Organization", "Engineering").is_ok());
        assert!(validate_entity_name("Team", "Platform & Tools!").is_ok());
    }

    #[test]
    fn test_empty_entity_name() {
        assert_eq!(
            validate_entity_name("Department", ""),
            Err(ValidationError::EmptyName("Department"))
        );
        assert_eq!(
            validate_entity_name("Department", "   "),
            Err(ValidationError::EmptyName("Department"))
        );
    }

    #[test]
    fn test_entity_name_too_long() {
        let long_name = "a".repeat(129);
        assert_eq!(
            validate_entity_name("Organization", &long_name),
            Err(ValidationError::NameTooLong("Organization", 128))
        );
    }
}
