//! In-memory team repository

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::department::DepartmentId;
use crate::domain::role::Role;
use crate::domain::team::{Team, TeamId, TeamMember, TeamRepository};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of TeamRepository
#[derive(Debug)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<String, Team>>,
    memberships: RwLock<HashMap<String, HashMap<String, Role>>>,
    users: Arc<dyn UserRepository>,
}

impl InMemoryTeamRepository {
    /// Creates a new empty repository
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            teams: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
            users,
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(teams.get(id.as_str()).cloned())
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = team.id().as_str().to_string();

        if teams.contains_key(&id) {
            return Err(DomainError::conflict(format!("Team '{}' already exists", id)));
        }

        teams.insert(id, team.clone());
        Ok(team)
    }

    async fn list_for_department(
        &self,
        department_id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Team>, DomainError> {
        let teams = self
            .teams
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<Team> = teams
            .values()
            .filter(|t| t.department_id() == department_id)
            .cloned()
            .collect();

        result.sort_by_key(|t| t.created_at());
        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn members(
        &self,
        id: &TeamId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TeamMember>, DomainError> {
        let membership: Vec<(String, Role)> = {
            let memberships = self
                .memberships
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

            memberships
                .get(id.as_str())
                .map(|members| {
                    members
                        .iter()
                        .map(|(user_id, role)| (user_id.clone(), *role))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut result = Vec::with_capacity(membership.len());

        for (user_id, role) in membership {
            let user_id = UserId::new(&user_id)
                .map_err(|e| DomainError::storage(format!("Invalid user ID in store: {}", e)))?;

            if let Some(user) = self.users.get(&user_id).await? {
                result.push(TeamMember {
                    user_id,
                    name: user.name().to_string(),
                    email: user.email().to_string(),
                    role,
                });
            }
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn add_member(
        &self,
        id: &TeamId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        {
            let teams = self
                .teams
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

            if !teams.contains_key(id.as_str()) {
                return Err(DomainError::not_found(format!("Team '{}' not found", id)));
            }
        }

        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        memberships
            .entry(id.as_str().to_string())
            .or_default()
            .insert(user_id.as_str().to_string(), role);

        Ok(())
    }

    async fn remove_member(&self, id: &TeamId, user_id: &UserId) -> Result<(), DomainError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(members) = memberships.get_mut(id.as_str()) {
            members.remove(user_id.as_str());
        }

        Ok(())
    }

    async fn remove_member_for_department(
        &self,
        department_id: &DepartmentId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let team_ids: Vec<String> = {
            let teams = self
                .teams
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

            teams
                .values()
                .filter(|t| t.department_id() == department_id)
                .map(|t| t.id().as_str().to_string())
                .collect()
        };

        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        for team_id in team_ids {
            if let Some(members) = memberships.get_mut(&team_id) {
                members.remove(user_id.as_str());
            }
        }

        Ok(())
    }

    async fn member_role(
        &self,
        user_id: &UserId,
        id: &TeamId,
    ) -> Result<Option<Role>, DomainError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(memberships
            .get(id.as_str())
            .and_then(|members| members.get(user_id.as_str()))
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn create_repo() -> InMemoryTeamRepository {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .create(User::new(
                UserId::new("user-1").unwrap(),
                "Ada",
                "ada@example.com",
            ))
            .await
            .unwrap();

        InMemoryTeamRepository::new(users)
    }

    fn test_team(id: &str, department: &str, name: &str) -> Team {
        Team::new(
            TeamId::new(id).unwrap(),
            DepartmentId::new(department).unwrap(),
            name,
        )
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = create_repo().await;

        repo.create(test_team("team-1", "dep-1", "Backend"))
            .await
            .unwrap();
        repo.create(test_team("team-2", "dep-1", "Frontend"))
            .await
            .unwrap();
        repo.create(test_team("team-3", "dep-2", "Ops"))
            .await
            .unwrap();

        let teams = repo
            .list_for_department(&DepartmentId::new("dep-1").unwrap(), 20, 0)
            .await
            .unwrap();
        assert_eq!(teams.len(), 2);
    }

    #[tokio::test]
    async fn test_membership_roundtrip() {
        let repo = create_repo().await;
        let team_id = TeamId::new("team-1").unwrap();
        let user_id = UserId::new("user-1").unwrap();

        repo.create(test_team("team-1", "dep-1", "Backend"))
            .await
            .unwrap();
        repo.add_member(&team_id, &user_id, Role::Member).await.unwrap();

        assert_eq!(
            repo.member_role(&user_id, &team_id).await.unwrap(),
            Some(Role::Member)
        );

        let members = repo.members(&team_id, 20, 0).await.unwrap();
        assert_eq!(members.len(), 1);

        repo.remove_member(&team_id, &user_id).await.unwrap();
        assert_eq!(repo.member_role(&user_id, &team_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_member_for_department() {
        let repo = create_repo().await;
        let user_id = UserId::new("user-1").unwrap();

        repo.create(test_team("team-1", "dep-1", "Backend"))
            .await
            .unwrap();
        repo.create(test_team("team-2", "dep-1", "Frontend"))
            .await
            .unwrap();
        repo.create(test_team("team-3", "dep-2", "Ops"))
            .await
            .unwrap();

        for team in ["team-1", "team-2", "team-3"] {
            repo.add_member(&TeamId::new(team).unwrap(), &user_id, Role::Member)
                .await
                .unwrap();
        }

        repo.remove_member_for_department(&DepartmentId::new("dep-1").unwrap(), &user_id)
            .await
            .unwrap();

        assert_eq!(
            repo.member_role(&user_id, &TeamId::new("team-1").unwrap())
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            repo.member_role(&user_id, &TeamId::new("team-2").unwrap())
                .await
                .unwrap(),
            None
        );
        // Membership in the other department's team survives
        assert_eq!(
            repo.member_role(&user_id, &TeamId::new("team-3").unwrap())
                .await
                .unwrap(),
            Some(Role::Member)
        );
    }

    #[tokio::test]
    async fn test_add_member_requires_existing_team() {
        let repo = create_repo().await;

        let result = repo
            .add_member(
                &TeamId::new("missing").unwrap(),
                &UserId::new("user-1").unwrap(),
                Role::Member,
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
