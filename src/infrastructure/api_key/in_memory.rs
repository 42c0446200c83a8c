//! In-memory API key repository
//!
//! Backs the `memory` storage mode and tests. Data is lost when the
//! process terminates.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Thread-safe in-memory implementation of ApiKeyRepository
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: RwLock<HashMap<String, ApiKey>>,
}

impl InMemoryApiKeyRepository {
    /// Creates a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = api_key.id().as_str().to_string();

        if keys.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key with prefix '{}' already exists",
                api_key.prefix()
            )));
        }

        keys.insert(id, api_key.clone());
        Ok(api_key)
    }

    async fn get_active(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let keys = self
            .keys
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(keys.get(id.as_str()).filter(|k| k.is_active()).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self
            .keys
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut result: Vec<ApiKey> = keys
            .values()
            .filter(|k| k.user_id() == user_id)
            .cloned()
            .collect();

        result.sort_by_key(|k| k.created_at());
        Ok(result)
    }

    async fn set_active(
        &self,
        user_id: &UserId,
        id: &ApiKeyId,
        active: bool,
    ) -> Result<(), DomainError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        match keys.get_mut(id.as_str()) {
            Some(key) if key.user_id() == user_id => {
                key.set_active(active);
                Ok(())
            }
            _ => Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id.prefix()
            ))),
        }
    }

    async fn delete(&self, user_id: &UserId, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        match keys.get(id.as_str()) {
            Some(key) if key.user_id() == user_id => {
                keys.remove(id.as_str());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
