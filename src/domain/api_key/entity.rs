//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_api_key_id, ApiKeyValidationError};
use crate::domain::user::UserId;

/// API key storage identifier: `<prefix>.<sha256-hex-of-presented-key>`
///
/// The prefix is the public, non-secret portion of the presented key and
/// doubles as the lookup index. The hash covers the whole presented key,
/// so the plaintext secret is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The public prefix portion of the identifier
    pub fn prefix(&self) -> &str {
        // Validation guarantees exactly one separator
        self.0.split('.').next().unwrap_or_default()
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API Key entity
///
/// Created on request, deactivated or deleted by the owning user, never
/// otherwise mutated. The plaintext key is returned once at creation and
/// is not recoverable from this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Storage identifier (`prefix.hash`)
    id: ApiKeyId,
    /// Display name chosen by the owner
    name: String,
    /// Owning user
    user_id: UserId,
    /// Whether the key is accepted during authentication
    active: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new active API key
    pub fn new(id: ApiKeyId, name: impl Into<String>, user_id: UserId) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            user_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct an API key from stored fields
    pub fn restore(
        id: ApiKeyId,
        name: String,
        user_id: UserId,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            user_id,
            active,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    /// Public prefix of the presented key
    pub fn prefix(&self) -> &str {
        self.id.prefix()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Toggle whether the key is accepted during authentication
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
