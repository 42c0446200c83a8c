//! Organization service

use std::sync::Arc;

use tracing::info;

use crate::domain::organization::{
    Organization, OrganizationId, OrganizationMember, OrganizationRepository, UserOrganization,
};
use crate::domain::role::Role;
use crate::domain::user::{UserId, UserRepository};
use crate::domain::validation::validate_entity_name;
use crate::domain::DomainError;

/// Service for organization management
#[derive(Debug)]
pub struct OrganizationService {
    repository: Arc<dyn OrganizationRepository>,
    users: Arc<dyn UserRepository>,
}

impl OrganizationService {
    /// Create a new organization service
    pub fn new(
        repository: Arc<dyn OrganizationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { repository, users }
    }

    /// Create an organization; the creator becomes an ADMIN member
    pub async fn create(&self, creator: &str, name: &str) -> Result<Organization, DomainError> {
        validate_entity_name("Organization", name)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let creator = parse_user_id(creator)?;
        let id = OrganizationId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(organization_id = %id, name = %name, "Creating organization");

        self.repository
            .create(Organization::new(id, name), &creator)
            .await
    }

    /// Get an organization by ID
    pub async fn get(&self, id: &str) -> Result<Option<Organization>, DomainError> {
        let id = parse_organization_id(id)?;
        self.repository.get(&id).await
    }

    /// List the organizations a user belongs to
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<UserOrganization>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        self.repository.list_for_user(&user_id).await
    }

    /// List members of an organization
    pub async fn members(
        &self,
        id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrganizationMember>, DomainError> {
        let id = parse_organization_id(id)?;
        self.repository.members(&id, limit, offset).await
    }

    /// Add a user to an organization by email
    pub async fn add_user(&self, id: &str, email: &str, role: Role) -> Result<(), DomainError> {
        let id = parse_organization_id(id)?;

        let user = self
            .users
            .get_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("User with email '{}' not found", email))
            })?;

        info!(organization_id = %id, user_id = %user.id(), role = %role, "Adding organization user");

        self.repository.add_member(&id, user.id(), role).await
    }

    /// Remove a user from an organization
    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<(), DomainError> {
        let id = parse_organization_id(id)?;
        let user_id = parse_user_id(user_id)?;

        info!(organization_id = %id, user_id = %user_id, "Removing organization user");

        self.repository.remove_member(&id, &user_id).await
    }

    /// Get a user's role in an organization, None when not a member
    pub async fn user_role(&self, user_id: &str, id: &str) -> Result<Option<Role>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let id = parse_organization_id(id)?;
        self.repository.member_role(&user_id, &id).await
    }
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_organization_id(id: &str) -> Result<OrganizationId, DomainError> {
    OrganizationId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}
