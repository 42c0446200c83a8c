//! Team service

use std::sync::Arc;

use tracing::info;

use crate::domain::department::{DepartmentId, DepartmentRepository};
use crate::domain::organization::{OrganizationId, OrganizationRepository};
use crate::domain::role::Role;
use crate::domain::team::{Team, TeamId, TeamMember, TeamRepository, TeamUserRoles};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::validation::validate_entity_name;
use crate::domain::DomainError;

/// Service for team management
///
/// Composes the organization and department repositories for the
/// three-level role lookup.
#[derive(Debug)]
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
    departments: Arc<dyn DepartmentRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    /// Create a new team service
    pub fn new(
        repository: Arc<dyn TeamRepository>,
        departments: Arc<dyn DepartmentRepository>,
        organizations: Arc<dyn OrganizationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            repository,
            departments,
            organizations,
            users,
        }
    }

    /// Create a team under a department
    pub async fn create(&self, department_id: &str, name: &str) -> Result<Team, DomainError> {
        validate_entity_name("Team", name).map_err(|e| DomainError::validation(e.to_string()))?;

        let department_id = parse_department_id(department_id)?;

        if self.departments.get(&department_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Department '{}' not found",
                department_id
            )));
        }

        let id = TeamId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(team_id = %id, department_id = %department_id, name = %name, "Creating team");

        self.repository
            .create(Team::new(id, department_id, name))
            .await
    }

    /// Get a team by ID
    pub async fn get(&self, id: &str) -> Result<Option<Team>, DomainError> {
        let id = parse_team_id(id)?;
        self.repository.get(&id).await
    }

    /// List teams of a department
    pub async fn list_for_department(
        &self,
        department_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Team>, DomainError> {
        let department_id = parse_department_id(department_id)?;
        self.repository
            .list_for_department(&department_id, limit, offset)
            .await
    }

    /// List members of a team
    pub async fn members(
        &self,
        id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TeamMember>, DomainError> {
        let id = parse_team_id(id)?;
        self.repository.members(&id, limit, offset).await
    }

    /// Add a user to a team by email
    pub async fn add_user(&self, id: &str, email: &str, role: Role) -> Result<(), DomainError> {
        let id = parse_team_id(id)?;

        let user = self
            .users
            .get_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("User with email '{}' not found", email))
            })?;

        info!(team_id = %id, user_id = %user.id(), role = %role, "Adding team user");

        self.repository.add_member(&id, user.id(), role).await
    }

    /// Remove a user from a team
    pub async fn remove_user(&self, id: &str, user_id: &str) -> Result<(), DomainError> {
        let id = parse_team_id(id)?;
        let user_id = parse_user_id(user_id)?;

        info!(team_id = %id, user_id = %user_id, "Removing team user");

        self.repository.remove_member(&id, &user_id).await
    }

    /// Get a user's roles at all three hierarchy levels
    ///
    /// None when the user is missing a role at any level.
    pub async fn user_roles(
        &self,
        user_id: &str,
        organization_id: &str,
        department_id: &str,
        id: &str,
    ) -> Result<Option<TeamUserRoles>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let organization_id = parse_organization_id(organization_id)?;
        let department_id = parse_department_id(department_id)?;
        let id = parse_team_id(id)?;

        let Some(organization_role) = self
            .organizations
            .member_role(&user_id, &organization_id)
            .await?
        else {
            return Ok(None);
        };

        let Some(department_role) = self
            .departments
            .member_role(&user_id, &department_id)
            .await?
        else {
            return Ok(None);
        };

        let Some(team_role) = self.repository.member_role(&user_id, &id).await? else {
            return Ok(None);
        };

        Ok(Some(TeamUserRoles {
            organization_role,
            department_role,
            team_role,
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

fn parse_team_id(id: &str) -> Result<TeamId, DomainError> {
    TeamId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::department::Department;
    use crate::domain::organization::Organization;
    use crate::domain::user::User;
    use crate::infrastructure::department::InMemoryDepartmentRepository;
    use crate::infrastructure::organization::InMemoryOrganizationRepository;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        service: TeamService,
        departments: Arc<InMemoryDepartmentRepository>,
    }

    async fn create_fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .create(User::new(
                UserId::new("user-1").unwrap(),
                "Ada",
                "ada@example.com",
            ))
            .await
            .unwrap();

        let organizations = Arc::new(InMemoryOrganizationRepository::new(users.clone()));
        organizations
            .create(
                Organization::new(OrganizationId::new("org-1").unwrap(), "Acme"),
                &UserId::new("user-1").unwrap(),
            )
            .await
            .unwrap();

        let departments = Arc::new(InMemoryDepartmentRepository::new(users.clone()));
        departments
            .create(Department::new(
                DepartmentId::new("dep-1").unwrap(),
                OrganizationId::new("org-1").unwrap(),
                "Engineering",
            ))
            .await
            .unwrap();

        let repository = Arc::new(InMemoryTeamRepository::new(users.clone()));

        Fixture {
            service: TeamService::new(repository, departments.clone(), organizations, users),
            departments,
        }
    }

    #[tokio::test]
    async fn test_create_team() {
        let fixture = create_fixture().await;

        let team = fixture.service.create("dep-1", "Backend").await.unwrap();

        assert_eq!(team.name(), "Backend");
        assert_eq!(team.department_id().as_str(), "dep-1");
    }

    #[tokio::test]
    async fn test_create_requires_existing_department() {
        let fixture = create_fixture().await;

        let result = fixture.service.create("missing-dep", "Backend").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_user_roles_requires_all_levels() {
        let fixture = create_fixture().await;
        let team = fixture.service.create("dep-1", "Backend").await.unwrap();

        // Org role only
        let roles = fixture
            .service
            .user_roles("user-1", "org-1", "dep-1", team.id().as_str())
            .await
            .unwrap();
        assert!(roles.is_none());

        // Add the department role
        fixture
            .departments
            .add_member(
                &DepartmentId::new("dep-1").unwrap(),
                &UserId::new("user-1").unwrap(),
                Role::Member,
            )
            .await
            .unwrap();

        let roles = fixture
            .service
            .user_roles("user-1", "org-1", "dep-1", team.id().as_str())
            .await
            .unwrap();
        assert!(roles.is_none());

        // Add the team role, now all levels resolve
        fixture
            .service
            .add_user(team.id().as_str(), "ada@example.com", Role::Admin)
            .await
            .unwrap();

        let roles = fixture
            .service
            .user_roles("user-1", "org-1", "dep-1", team.id().as_str())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(roles.organization_role, Role::Admin);
        assert_eq!(roles.department_role, Role::Member);
        assert_eq!(roles.team_role, Role::Admin);
    }

    #[tokio::test]
    async fn test_add_and_remove_user() {
        let fixture = create_fixture().await;
        let team = fixture.service.create("dep-1", "Backend").await.unwrap();

        fixture
            .service
            .add_user(team.id().as_str(), "ada@example.com", Role::Member)
            .await
            .unwrap();

        let members = fixture
            .service
            .members(team.id().as_str(), 20, 0)
            .await
            .unwrap();
        assert_eq!(members.len(), 1);

        fixture
            .service
            .remove_user(team.id().as_str(), "user-1")
            .await
            .unwrap();

        let members = fixture
            .service
            .members(team.id().as_str(), 20, 0)
            .await
            .unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_user_is_not_found() {
        let fixture = create_fixture().await;
        let team = fixture.service.create("dep-1", "Backend").await.unwrap();

        let result = fixture
            .service
            .add_user(team.id().as_str(), "nobody@example.com", Role::Member)
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
