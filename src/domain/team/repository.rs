//! Team repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Team, TeamId, TeamMember};
use crate::domain::department::DepartmentId;
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for teams and their memberships
#[async_trait]
pub trait TeamRepository: Send + Sync + Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// List teams belonging to a department
    async fn list_for_department(
        &self,
        department_id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Team>, DomainError>;

    /// List members of a team
    async fn members(
        &self,
        id: &TeamId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TeamMember>, DomainError>;

    /// Add or replace a user's membership
    async fn add_member(&self, id: &TeamId, user_id: &UserId, role: Role)
        -> Result<(), DomainError>;

    /// Remove a user's membership, no-op when absent
    async fn remove_member(&self, id: &TeamId, user_id: &UserId) -> Result<(), DomainError>;

    /// Remove a user from every team of a department
    ///
    /// Runs when a user leaves the parent department.
    async fn remove_member_for_department(
        &self,
        department_id: &DepartmentId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    /// Get a user's role in a team, None when not a member
    async fn member_role(&self, user_id: &UserId, id: &TeamId)
        -> Result<Option<Role>, DomainError>;
}
