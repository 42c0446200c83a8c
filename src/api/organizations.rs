//! Organization endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{OrganizationContext, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Pagination};
use crate::domain::organization::{Organization, OrganizationMember};
use crate::domain::role::Role;
use crate::domain::DomainError;

/// Request to create an organization
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// Request to add a user to an organization
#[derive(Debug, Clone, Deserialize)]
pub struct AddUserRequest {
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Organization response
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Organization> for OrganizationResponse {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id().as_str().to_string(),
            name: org.name().to_string(),
            created_at: org.created_at().to_rfc3339(),
            updated_at: org.updated_at().to_rfc3339(),
        }
    }
}

/// An organization together with the caller's role
#[derive(Debug, Clone, Serialize)]
pub struct UserOrganizationResponse {
    pub organization: OrganizationResponse,
    pub organization_role: Role,
}

/// Member list response
#[derive(Debug, Clone, Serialize)]
pub struct MembersResponse {
    pub users: Vec<OrganizationMember>,
}

/// GET /api/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<UserOrganizationResponse>>, ApiError> {
    state.require_organizations_enabled()?;

    let organizations = state
        .organization_service
        .list_for_user(user.id().as_str())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        organizations
            .iter()
            .map(|entry| UserOrganizationResponse {
                organization: OrganizationResponse::from(&entry.organization),
                organization_role: entry.role,
            })
            .collect(),
    ))
}

/// POST /api/organizations
///
/// The creator becomes an ADMIN member of the new organization.
pub async fn create_organization(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    state.require_organizations_enabled()?;

    debug!(user_id = %user.id(), name = %request.name, "Creating organization");

    let organization = state
        .organization_service
        .create(user.id().as_str(), &request.name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(OrganizationResponse::from(&organization)))
}

/// GET /api/organizations/{org_id}
pub async fn get_organization(
    State(state): State<AppState>,
    ctx: OrganizationContext,
    Path(org_id): Path<String>,
) -> Result<Json<UserOrganizationResponse>, ApiError> {
    state.require_organizations_enabled()?;

    let organization = state
        .organization_service
        .get(&org_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::from(DomainError::not_found(format!(
                "Organization '{}' not found",
                org_id
            )))
        })?;

    Ok(Json(UserOrganizationResponse {
        organization: OrganizationResponse::from(&organization),
        organization_role: ctx.organization_role,
    }))
}

/// GET /api/organizations/{org_id}/users
pub async fn list_organization_users(
    State(state): State<AppState>,
    _ctx: OrganizationContext,
    Path(org_id): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<MembersResponse>, ApiError> {
    state.require_organizations_enabled()?;

    let page = page.clamped();
    let users = state
        .organization_service
        .members(&org_id, page.limit, page.offset)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MembersResponse { users }))
}

/// POST /api/organizations/{org_id}/users
pub async fn add_organization_user(
    State(state): State<AppState>,
    _ctx: OrganizationContext,
    Path(org_id): Path<String>,
    Json(request): Json<AddUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    state
        .organization_service
        .add_user(&org_id, &request.email, request.role)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "added": true })))
}

/// DELETE /api/organizations/{org_id}/users/{user_id}
pub async fn remove_organization_user(
    State(state): State<AppState>,
    _ctx: OrganizationContext,
    Path((org_id, user_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    state
        .organization_service
        .remove_user(&org_id, &user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
