//! Department entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::organization::OrganizationId;
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::validation::{validate_entity_id, ValidationError};

/// Department identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentId(String);

impl DepartmentId {
    /// Create a new DepartmentId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_entity_id("Department", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DepartmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DepartmentId> for String {
    fn from(id: DepartmentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Department entity - the middle level of the tenancy hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier
    id: DepartmentId,
    /// Owning organization
    organization_id: OrganizationId,
    /// Display name
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Department {
    /// Create a new department
    pub fn new(
        id: DepartmentId,
        organization_id: OrganizationId,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            organization_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a department from stored fields
    pub fn restore(
        id: DepartmentId,
        organization_id: OrganizationId,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            organization_id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &DepartmentId {
        &self.id
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
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

/// Caller's roles at the organization and department levels
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DepartmentUserRole {
    pub organization_role: Role,
    pub department_role: Role,
}

/// Membership projection for listing department users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentMember {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_id_valid() {
        let id = DepartmentId::new("dep-1").unwrap();
        assert_eq!(id.as_str(), "dep-1");
    }

    #[test]
    fn test_department_id_invalid() {
        assert!(DepartmentId::new("").is_err());
        assert!(DepartmentId::new("dep 1").is_err());
    }

    #[test]
    fn test_department_creation() {
        let dep = Department::new(
            DepartmentId::new("dep-1").unwrap(),
            OrganizationId::new("org-1").unwrap(),
            "Engineering",
        );

        assert_eq!(dep.id().as_str(), "dep-1");
        assert_eq!(dep.organization_id().as_str(), "org-1");
        assert_eq!(dep.name(), "Engineering");
    }
}
