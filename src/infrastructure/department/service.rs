//! Department service

use std::sync::Arc;

use tracing::info;

use crate::domain::department::{
    Department, DepartmentId, DepartmentMember, DepartmentRepository, DepartmentUserRole,
};
use crate::domain::organization::{OrganizationId, OrganizationRepository};
use crate::domain::role::Role;
use crate::domain::team::TeamRepository;
use crate::domain::user::{UserId, UserRepository};
use crate::domain::validation::validate_entity_name;
use crate::domain::DomainError;

/// Service for department management
///
/// Composes the organization repository for the two-level role lookup and
/// the team repository for the membership cascade on removal.
#[derive(Debug)]
pub struct DepartmentService {
    repository: Arc<dyn DepartmentRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl DepartmentService {
    /// Create a new department service
    pub fn new(
        repository: Arc<dyn DepartmentRepository>,
        organizations: Arc<dyn OrganizationRepository>,
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            repository,
            organizations,
            teams,
            users,
        }
    }

    /// Create a department under an organization
    pub async fn create(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<Department, DomainError> {
        validate_entity_name("Department", name)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let organization_id = parse_organization_id(organization_id)?;

        if self.organizations.get(&organization_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Organization '{}' not found",
                organization_id
            )));
        }

        let id = DepartmentId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(department_id = %id, organization_id = %organization_id, name = %name, "Creating department");

        self.repository
            .create(Department::new(id, organization_id, name))
            .await
    }

    /// Get a department by ID
    pub async fn get(&self, id: &str) -> Result<Option<Department>, DomainError> {
        let id = parse_department_id(id)?;
        self.repository.get(&id).await
    }

    /// List departments of an organization
    pub async fn list_for_organization(
        &self,
        organization_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Department>, DomainError> {
        let organization_id = parse_organization_id(organization_id)?;
        self.repository
            .list_for_organization(&organization_id, limit, offset)
            .await
    }

    /// List members of a department
    pub async fn members(
        &self,
        id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DepartmentMember>, DomainError> {
        let id = parse_department_id(id)?;
        self.repository.members(&id, limit, offset).await
    }

    /// Add a user to a department by email
    pub async fn add_user(&self, id: &str, email: &str, role: Role) -> Result<(), DomainError> {
        let id = parse_department_id(id)?;

        let user = self
            .users
            .get_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("User with email '{}' not found", email))
            })?;

        info!(department_id = %id, user_id = %user.id(), role = %role, "Adding department user");

        self.repository.add_member(&id, user.id(), role).await
    }

    /// Remove a user from a department and from its teams
    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<(), DomainError> {
        let id = parse_department_id(id)?;
        let user_id = parse_user_id(user_id)?;

        info!(department_id = %id, user_id = %user_id, "Removing department user");

        self.teams
            .remove_member_for_department(&id, &user_id)
            .await?;
        self.repository.remove_member(&id, &user_id).await
    }

    /// Get a user's roles at the organization and department levels
    ///
    /// None when the user is missing a role at either level.
    pub async fn user_role(
        &self,
        user_id: &str,
        organization_id: &str,
        id: &str,
    ) -> Result<Option<DepartmentUserRole>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let organization_id = parse_organization_id(organization_id)?;
        let id = parse_department_id(id)?;

        let Some(organization_role) = self
            .organizations
            .member_role(&user_id, &organization_id)
            .await?
        else {
            return Ok(None);
        };

        let Some(department_role) = self.repository.member_role(&user_id, &id).await? else {
            return Ok(None);
        };

        Ok(Some(DepartmentUserRole {
            organization_role,
            department_role,
        }))
    }
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_organization_id(id: &str) -> Result<OrganizationId, DomainError> {
    OrganizationId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_department_id(id: &str) -> Result<DepartmentId, DomainError> {
    DepartmentId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}
