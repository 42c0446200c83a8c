//! In-memory organization repository

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::organization::{
    Organization, OrganizationId, OrganizationMember, OrganizationRepository, UserOrganization,
};
use crate::domain::role::Role;
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of OrganizationRepository
///
/// Member projections join against the user repository, mirroring what the
/// SQL implementation does with a JOIN.
#[derive(Debug)]
pub struct InMemoryOrganizationRepository {
    organizations: RwLock<HashMap<String, Organization>>,
    memberships: RwLock<HashMap<String, HashMap<String, Role>>>,
    users: Arc<dyn UserRepository>,
}

impl InMemoryOrganizationRepository {
    /// Creates a new empty repository
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            organizations: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
            users,
        }
    }

    fn role_of(&self, organization_id: &str, user_id: &str) -> Result<Option<Role>, DomainError> {
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(memberships
            .get(organization_id)
            .and_then(|members| members.get(user_id))
            .copied())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, DomainError> {
        let organizations = self
            .organizations
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(organizations.get(id.as_str()).cloned())
    }

    async fn create(
        &self,
        organization: Organization,
        creator: &UserId,
    ) -> Result<Organization, DomainError> {
        let mut organizations = self
            .organizations
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = organization.id().as_str().to_string();

        if organizations.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Organization '{}' already exists",
                id
            )));
        }

        organizations.insert(id.clone(), organization.clone());

        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        memberships
            .entry(id)
            .or_default()
            .insert(creator.as_str().to_string(), Role::Admin);

        Ok(organization)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserOrganization>, DomainError> {
        let organizations = self
            .organizations
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;
        let memberships = self
            .memberships
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<UserOrganization> = memberships
            .iter()
            .filter_map(|(org_id, members)| {
                let role = members.get(user_id.as_str())?;
                let organization = organizations.get(org_id)?;
                Some(UserOrganization {
                    organization: organization.clone(),
                    role: *role,
                })
            })
            .collect();

        result.sort_by_key(|entry| entry.organization.created_at());
        Ok(result)
    }

    async fn members(
        &self,
        id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrganizationMember>, DomainError> {
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
                result.push(OrganizationMember {
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
        id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        {
            let organizations = self
                .organizations
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

            if !organizations.contains_key(id.as_str()) {
                return Err(DomainError::not_found(format!(
                    "Organization '{}' not found",
                    id
                )));
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

    async fn remove_member(
        &self,
        id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(members) = memberships.get_mut(id.as_str()) {
            members.remove(user_id.as_str());
        }

        Ok(())
    }

    async fn member_role(
        &self,
        user_id: &UserId,
        id: &OrganizationId,
    ) -> Result<Option<Role>, DomainError> {
        self.role_of(id.as_str(), user_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn create_repo() -> (InMemoryOrganizationRepository, UserId) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = User::new(UserId::new("user-1").unwrap(), "Ada", "ada@example.com");
        users.create(user.clone()).await.unwrap();

        (
            InMemoryOrganizationRepository::new(users),
            user.id().clone(),
        )
    }

    fn test_org(id: &str, name: &str) -> Organization {
        Organization::new(OrganizationId::new(id).unwrap(), name)
    }

    #[tokio::test]
    async fn test_create_grants_creator_admin() {
        let (repo, creator) = create_repo().await;

        repo.create(test_org("org-1", "Acme"), &creator).await.unwrap();

        let role = repo
            .member_role(&creator, &OrganizationId::new("org-1").unwrap())
            .await
            .unwrap();
        assert_eq!(role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let (repo, creator) = create_repo().await;

        repo.create(test_org("org-1", "Acme"), &creator).await.unwrap();
        repo.create(test_org("org-2", "Initech"), &creator)
            .await
            .unwrap();

        let orgs = repo.list_for_user(&creator).await.unwrap();
        assert_eq!(orgs.len(), 2);

        let stranger = UserId::new("user-9").unwrap();
        assert!(repo.list_for_user(&stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_members_joins_user_records() {
        let (repo, creator) = create_repo().await;
        let org_id = OrganizationId::new("org-1").unwrap();

        repo.create(test_org("org-1", "Acme"), &creator).await.unwrap();

        let members = repo.members(&org_id, 20, 0).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email, "ada@example.com");
        assert_eq!(members[0].role, Role::Admin);
    }

    #[tokio::test]
    async fn test_remove_member() {
        let (repo, creator) = create_repo().await;
        let org_id = OrganizationId::new("org-1").unwrap();

        repo.create(test_org("org-1", "Acme"), &creator).await.unwrap();
        repo.remove_member(&org_id, &creator).await.unwrap();

        assert_eq!(repo.member_role(&creator, &org_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_member_requires_existing_org() {
        let (repo, creator) = create_repo().await;

        let result = repo
            .add_member(
                &OrganizationId::new("missing").unwrap(),
                &creator,
                Role::Member,
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
