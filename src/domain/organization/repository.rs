//! Organization repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Organization, OrganizationId, OrganizationMember, UserOrganization};
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for organizations and their memberships
#[async_trait]
pub trait OrganizationRepository: Send + Sync + Debug {
    /// Get an organization by ID
    async fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, DomainError>;

    /// Create an organization; the creator becomes an ADMIN member
    async fn create(
        &self,
        organization: Organization,
        creator: &UserId,
    ) -> Result<Organization, DomainError>;

    /// List the organizations a user belongs to, with their role
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserOrganization>, DomainError>;

    /// List members of an organization
    async fn members(
        &self,
        id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrganizationMember>, DomainError>;

    /// Add or replace a user's membership
    async fn add_member(
        &self,
        id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError>;

    /// Remove a user's membership, no-op when absent
    async fn remove_member(&self, id: &OrganizationId, user_id: &UserId)
        -> Result<(), DomainError>;

    /// Get a user's role in an organization, None when not a member
    async fn member_role(
        &self,
        user_id: &UserId,
        id: &OrganizationId,
    ) -> Result<Option<Role>, DomainError>;
}
