//! API key management endpoints
//!
//! All operations are scoped to the authenticated caller; there is no way
//! to address another user's keys.

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::ApiKey;

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

/// Request to toggle a key's active flag
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub active: bool,
}

/// API key response, never contains the secret
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub prefix: String,
    pub name: String,
    pub user_id: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().as_str().to_string(),
            prefix: key.prefix().to_string(),
            name: key.name().to_string(),
            user_id: key.user_id().as_str().to_string(),
            active: key.is_active(),
            created_at: key.created_at().to_rfc3339(),
            updated_at: key.updated_at().to_rfc3339(),
        }
    }
}

/// API key response with the one-time plaintext secret
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyWithSecretResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub secret: String,
}

/// List of the caller's API keys
#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

impl ListApiKeysResponse {
    fn from_keys(keys: &[ApiKey]) -> Self {
        let api_keys: Vec<ApiKeyResponse> = keys.iter().map(ApiKeyResponse::from).collect();
        let total = api_keys.len();

        Self { api_keys, total }
    }
}

/// GET /api/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(user_id = %user.id(), "Listing API keys");

    let keys = state
        .api_key_service
        .list(user.id().as_str())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListApiKeysResponse::from_keys(&keys)))
}

/// POST /api/api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKeyWithSecretResponse>, ApiError> {
    debug!(user_id = %user.id(), name = %request.name, "Creating API key");

    let created = state
        .api_key_service
        .create(user.id().as_str(), &request.name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyWithSecretResponse {
        api_key: ApiKeyResponse::from(&created.api_key),
        secret: created.secret,
    }))
}

/// PUT /api/api-keys/{key_id}
///
/// Toggles the active flag only; returns the refreshed key list.
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(key_id): Path<String>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(user_id = %user.id(), active = request.active, "Updating API key");

    let keys = state
        .api_key_service
        .set_active(user.id().as_str(), &key_id, request.active)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListApiKeysResponse::from_keys(&keys)))
}

/// DELETE /api/api-keys/{key_id}
///
/// Returns the refreshed key list.
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(key_id): Path<String>,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(user_id = %user.id(), "Deleting API key");

    let keys = state
        .api_key_service
        .delete(user.id().as_str(), &key_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListApiKeysResponse::from_keys(&keys)))
}
