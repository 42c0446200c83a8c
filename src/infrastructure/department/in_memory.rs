//! In-memory department repository

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::department::{
    Department, DepartmentId, DepartmentMember, DepartmentRepository,
};
use crate::domain::organization::OrganizationId;
use crate::domain::role::Role;
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of DepartmentRepository
#[derive(Debug)]
pub struct InMemoryDepartmentRepository {
    departments: RwLock<HashMap<String, Department>>,
    memberships: RwLock<HashMap<String, HashMap<String, Role>>>,
    users: Arc<dyn UserRepository>,
}

impl InMemoryDepartmentRepository {
    /// Creates a new empty repository
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            departments: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
            users,
        }
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn get(&self, id: &DepartmentId) -> Result<Option<Department>, DomainError> {
        let departments = self
            .departments
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(departments.get(id.as_str()).cloned())
    }

    async fn create(&self, department: Department) -> Result<Department, DomainError> {
        let mut departments = self
            .departments
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = department.id().as_str().to_string();

        if departments.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Department '{}' already exists",
                id
            )));
        }

        departments.insert(id, department.clone());
        Ok(department)
    }

    async fn list_for_organization(
        &self,
        organization_id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Department>, DomainError> {
        let departments = self
            .departments
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<Department> = departments
            .values()
            .filter(|d| d.organization_id() == organization_id)
            .cloned()
            .collect();

        result.sort_by_key(|d| d.created_at());
        Ok(result
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn members(
        &self,
        id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DepartmentMember>, DomainError> {
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
                result.push(DepartmentMember {
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
        id: &DepartmentId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        {
            let departments = self
                .departments
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

            if !departments.contains_key(id.as_str()) {
                return Err(DomainError::not_found(format!(
                    "Department '{}' not found",
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

    async fn remove_member(&self, id: &DepartmentId, user_id: &UserId) -> Result<(), DomainError> {
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
        id: &DepartmentId,
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
