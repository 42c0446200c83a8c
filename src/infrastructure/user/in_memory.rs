//! In-memory user repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let email = email.to_lowercase();
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if users.contains_key(user.id().as_str()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::conflict(format!(
                "User with email '{}' already exists",
                user.email()
            )));
        }

        users.insert(user.id().as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self
            .users
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.len())
    }
}
