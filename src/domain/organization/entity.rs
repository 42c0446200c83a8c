//! Organization entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::validation::{validate_entity_id, ValidationError};

/// Organization identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Create a new OrganizationId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_entity_id("Organization", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrganizationId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organization entity - the top level of the tenancy hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier
    id: OrganizationId,
    /// Display name
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization
    pub fn new(id: OrganizationId, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct an organization from stored fields
    pub fn restore(
        id: OrganizationId,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// An organization together with the caller's role in it
#[derive(Debug, Clone, Serialize)]
pub struct UserOrganization {
    pub organization: Organization,
    pub role: Role,
}

/// Membership projection for listing organization users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_id_valid() {
        let id = OrganizationId::new("org-1").unwrap();
        assert_eq!(id.as_str(), "org-1");
    }

    #[test]
    fn test_organization_id_invalid() {
        assert!(OrganizationId::new("").is_err());
        assert!(OrganizationId::new("org one").is_err());
    }

    #[test]
    fn test_organization_creation() {
        let org = Organization::new(OrganizationId::new("org-1").unwrap(), "Acme");

        assert_eq!(org.id().as_str(), "org-1");
        assert_eq!(org.name(), "Acme");
    }

    #[test]
    fn test_user_organization_serialization() {
        let org = Organization::new(OrganizationId::new("org-1").unwrap(), "Acme");
        let entry = UserOrganization {
            organization: org,
            role: Role::Admin,
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"role\":\"ADMIN\""));
        assert!(json.contains("\"name\":\"Acme\""));
    }
}
