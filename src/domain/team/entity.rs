//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::department::DepartmentId;
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::validation::{validate_entity_id, ValidationError};

/// Team identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    /// Create a new TeamId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_entity_id("Team", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity - the bottom level of the tenancy hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Owning department
    department_id: DepartmentId,
    /// Display name
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team
    pub fn new(id: TeamId, department_id: DepartmentId, name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            department_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a team from stored fields
    pub fn restore(
        id: TeamId,
        department_id: DepartmentId,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            department_id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn department_id(&self) -> &DepartmentId {
        &self.department_id
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

/// Caller's roles at all three hierarchy levels
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TeamUserRoles {
    pub organization_role: Role,
    pub department_role: Role,
    pub team_role: Role,
}

/// Membership projection for listing team users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}
