//! Department repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Department, DepartmentId, DepartmentMember};
use crate::domain::organization::OrganizationId;
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for departments and their memberships
#[async_trait]
pub trait DepartmentRepository: Send + Sync + Debug {
    /// Get a department by ID
    async fn get(&self, id: &DepartmentId) -> Result<Option<Department>, DomainError>;

    /// Create a new department
    async fn create(&self, department: Department) -> Result<Department, DomainError>;

    /// List departments belonging to an organization
    async fn list_for_organization(
        &self,
        organization_id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Department>, DomainError>;

    /// List members of a department
    async fn members(
        &self,
        id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DepartmentMember>, DomainError>;

    /// Add or replace a user's membership
    async fn add_member(
        &self,
        id: &DepartmentId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError>;

    /// Remove a user's membership, no-op when absent
    async fn remove_member(&self, id: &DepartmentId, user_id: &UserId) -> Result<(), DomainError>;

    /// Get a user's role in a department, None when not a member
    async fn member_role(
        &self,
        user_id: &UserId,
        id: &DepartmentId,
    ) -> Result<Option<Role>, DomainError>;
}
