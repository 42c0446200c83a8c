//! API key service
//!
//! High-level operations for the API key lifecycle: issuance, listing,
//! activation toggling, deletion and authentication lookup.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{validate_api_key_name, ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreatedApiKey {
    /// The stored API key record (without the secret)
    pub api_key: ApiKey,
    /// The full presented key, returned exactly once
    pub secret: String,
}

/// Service for managing a user's API keys
#[derive(Debug)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    users: Arc<dyn UserRepository>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService {
    /// Create a new API key service
    pub fn new(repository: Arc<dyn ApiKeyRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            users,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Generate and store a new API key for a user
    pub async fn create(&self, user_id: &str, name: &str) -> Result<CreatedApiKey, DomainError> {
        let user_id = parse_user_id(user_id)?;
        validate_api_key_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        info!(user_id = %user_id, name = %name, "Creating API key");

        let generated = self.generator.generate();
        let api_key = ApiKey::new(generated.id, name, user_id);
        let created = self.repository.create(api_key).await?;

        info!(prefix = %created.prefix(), "API key created");

        Ok(CreatedApiKey {
            api_key: created,
            secret: generated.key,
        })
    }

    /// Store an API key with a known presented secret
    ///
    /// Bootstrap path for provisioning a key from the environment; regular
    /// issuance always goes through `create`.
    pub async fn create_with_secret(
        &self,
        user_id: &str,
        name: &str,
        presented: &str,
    ) -> Result<CreatedApiKey, DomainError> {
        let user_id = parse_user_id(user_id)?;
        validate_api_key_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let generated = self
            .generator
            .from_presented(presented)
            .ok_or_else(|| DomainError::validation("API key must be of the form prefix.secret"))?;

        info!(user_id = %user_id, prefix = %generated.prefix, "Creating API key with known secret");

        let api_key = ApiKey::new(generated.id, name, user_id);
        let created = self.repository.create(api_key).await?;

        Ok(CreatedApiKey {
            api_key: created,
            secret: generated.key,
        })
    }

    /// Resolve a presented API key to its owning user
    ///
    /// Returns None for malformed keys, unknown keys and inactive keys;
    /// the caller decides how to surface the rejection.
    pub async fn authenticate(&self, presented: &str) -> Result<Option<User>, DomainError> {
        let Some(key_id) = self.generator.key_id(presented) else {
            debug!("Presented API key is malformed");
            return Ok(None);
        };

        debug!(prefix = %key_id.prefix(), "Looking up API key");

        let Some(api_key) = self.repository.get_active(&key_id).await? else {
            debug!(prefix = %key_id.prefix(), "No active API key match");
            return Ok(None);
        };

        self.users.get(api_key.user_id()).await
    }

    /// List a user's API keys ordered by creation time
    pub async fn list(&self, user_id: &str) -> Result<Vec<ApiKey>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        self.repository.list_for_user(&user_id).await
    }

    /// Toggle a key's active flag, returning the user's refreshed key list
    pub async fn set_active(
        &self,
        user_id: &str,
        key_id: &str,
        active: bool,
    ) -> Result<Vec<ApiKey>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let key_id = parse_key_id(key_id)?;

        info!(user_id = %user_id, prefix = %key_id.prefix(), active, "Updating API key");

        self.repository.set_active(&user_id, &key_id, active).await?;
        self.repository.list_for_user(&user_id).await
    }

    /// Delete a key, returning the user's refreshed key list
    pub async fn delete(&self, user_id: &str, key_id: &str) -> Result<Vec<ApiKey>, DomainError> {
        let user_id = parse_user_id(user_id)?;
        let key_id = parse_key_id(key_id)?;

        info!(user_id = %user_id, prefix = %key_id.prefix(), "Deleting API key");

        if !self.repository.delete(&user_id, &key_id).await? {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                key_id.prefix()
            )));
        }

        self.repository.list_for_user(&user_id).await
    }
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_key_id(id: &str) -> Result<ApiKeyId, DomainError> {
    ApiKeyId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn create_service() -> (ApiKeyService, User) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = User::new(
            UserId::new("user-1").unwrap(),
            "Ada",
            "ada@example.com",
        );
        users.create(user.clone()).await.unwrap();

        let repository = Arc::new(InMemoryApiKeyRepository::new());
        (ApiKeyService::new(repository, users), user)
    }

    #[tokio::test]
    async fn test_create_returns_one_time_secret() {
        let (service, _) = create_service().await;

        let created = service.create("user-1", "CI key").await.unwrap();

        let (prefix, secret) = created.secret.split_once('.').unwrap();
        assert_eq!(prefix.len(), 8);
        assert_eq!(secret.len(), 32);
        assert_eq!(created.api_key.prefix(), prefix);
        assert_eq!(created.api_key.name(), "CI key");
        assert!(created.api_key.is_active());
    }

    #[tokio::test]
    async fn test_create_twice_yields_distinct_keys() {
        let (service, _) = create_service().await;

        let first = service.create("user-1", "Key 1").await.unwrap();
        let second = service.create("user-1", "Key 2").await.unwrap();

        assert_ne!(first.secret, second.secret);
        assert_ne!(first.api_key.prefix(), second.api_key.prefix());
        assert_ne!(first.api_key.id(), second.api_key.id());
    }

    #[tokio::test]
    async fn test_created_key_authenticates_to_creator() {
        let (service, user) = create_service().await;

        let created = service.create("user-1", "CI key").await.unwrap();

        let resolved = service.authenticate(&created.secret).await.unwrap();
        assert_eq!(resolved.unwrap().id(), user.id());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_and_malformed_keys() {
        let (service, _) = create_service().await;

        assert!(service
            .authenticate("abcd1234.nosuchsecretnosuchsecret12345678")
            .await
            .unwrap()
            .is_none());
        assert!(service.authenticate("malformed").await.unwrap().is_none());
        assert!(service.authenticate("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deactivated_key_fails_authentication_but_stays_listed() {
        let (service, _) = create_service().await;

        let created = service.create("user-1", "CI key").await.unwrap();
        let key_id = created.api_key.id().as_str().to_string();

        let keys = service.set_active("user-1", &key_id, false).await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(!keys[0].is_active());

        assert!(service.authenticate(&created.secret).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reactivated_key_authenticates_again() {
        let (service, user) = create_service().await;

        let created = service.create("user-1", "CI key").await.unwrap();
        let key_id = created.api_key.id().as_str().to_string();

        service.set_active("user-1", &key_id, false).await.unwrap();
        service.set_active("user-1", &key_id, true).await.unwrap();

        let resolved = service.authenticate(&created.secret).await.unwrap();
        assert_eq!(resolved.unwrap().id(), user.id());
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target_key() {
        let (service, _) = create_service().await;

        let first = service.create("user-1", "Key 1").await.unwrap();
        let second = service.create("user-1", "Key 2").await.unwrap();

        let keys = service
            .delete("user-1", first.api_key.id().as_str())
            .await
            .unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].id(), second.api_key.id());

        // The surviving key still authenticates
        assert!(service.authenticate(&second.secret).await.unwrap().is_some());
        assert!(service.authenticate(&first.secret).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_key_is_not_found() {
        let (service, _) = create_service().await;

        let result = service
            .delete("user-1", "abcd1234.0000000000000000000000000000000000000000000000000000000000000000")
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_mutations_are_scoped_to_the_owner() {
        let (service, _) = create_service().await;

        let created = service.create("user-1", "CI key").await.unwrap();
        let key_id = created.api_key.id().as_str().to_string();

        let result = service.set_active("user-2", &key_id, false).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        // Still active for the real owner
        let keys = service.list("user-1").await.unwrap();
        assert!(keys[0].is_active());
    }

    #[tokio::test]
    async fn test_create_with_secret_is_deterministic() {
        let (service, user) = create_service().await;

        let created = service
            .create_with_secret("user-1", "Bootstrap key", "abcd1234.knownsecretknownsecret")
            .await
            .unwrap();

        assert_eq!(created.secret, "abcd1234.knownsecretknownsecret");

        let resolved = service
            .authenticate("abcd1234.knownsecretknownsecret")
            .await
            .unwrap();
        assert_eq!(resolved.unwrap().id(), user.id());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let (service, _) = create_service().await;

        let result = service.create("user-1", "").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_time() {
        let (service, _) = create_service().await;

        service.create("user-1", "First").await.unwrap();
        service.create("user-1", "Second").await.unwrap();
        service.create("user-1", "Third").await.unwrap();

        let keys = service.list("user-1").await.unwrap();
        let names: Vec<&str> = keys.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
