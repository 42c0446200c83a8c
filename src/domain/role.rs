//! Membership roles shared by every level of the tenancy hierarchy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a user within an organization, department or team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular member
    #[default]
    Member,
    /// Admin - can manage members at this level
    Admin,
}

impl Role {
    /// The role as its wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::Admin => "ADMIN",
        }
    }

    /// Check if this role can manage members at its level
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a role from a string
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown role '{0}', expected MEMBER or ADMIN")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(Self::Member),
            "ADMIN" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Member.as_str(), "MEMBER");
        assert_eq!(Role::Admin.as_str(), "ADMIN");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("MEMBER".parse::<Role>().unwrap(), Role::Member);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_privileges() {
        assert!(Role::Admin.can_manage_members());
        assert!(!Role::Member.can_manage_members());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), "\"MEMBER\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::Member);
    }
}
