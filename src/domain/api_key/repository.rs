//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// Mutations are always scoped to the owning user so one user can never
/// toggle or delete another user's key.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Get an API key by ID, only if it is currently active
    ///
    /// Used during authentication, where inactive keys must not resolve.
    async fn get_active(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// List a user's API keys ordered by creation time
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError>;

    /// Update the active flag of a user's key
    ///
    /// Returns `NotFound` when the key does not exist or belongs to
    /// another user.
    async fn set_active(
        &self,
        user_id: &UserId,
        id: &ApiKeyId,
        active: bool,
    ) -> Result<(), DomainError>;

    /// Delete a user's key, returns true if a key was removed
    async fn delete(&self, user_id: &UserId, id: &ApiKeyId) -> Result<bool, DomainError>;
}
