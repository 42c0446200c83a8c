//! Department endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{DepartmentContext, OrganizationContext};
use crate::api::organizations::{AddUserRequest, OrganizationResponse};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Pagination};
use crate::domain::department::{Department, DepartmentMember};
use crate::domain::role::Role;
use crate::domain::DomainError;

/// Request to create a department
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

/// Department response
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Department> for DepartmentResponse {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id().as_str().to_string(),
            organization_id: department.organization_id().as_str().to_string(),
            name: department.name().to_string(),
            created_at: department.created_at().to_rfc3339(),
            updated_at: department.updated_at().to_rfc3339(),
        }
    }
}

/// Department detail with the caller's roles at both levels
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentDetailResponse {
    pub organization: OrganizationResponse,
    pub department: DepartmentResponse,
    pub organization_role: Role,
    pub department_role: Role,
}

/// Member list response
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentMembersResponse {
    pub users: Vec<DepartmentMember>,
}

/// GET /api/organizations/{org_id}/departments
pub async fn list_departments(
    State(state): State<AppState>,
    _ctx: OrganizationContext,
    Path(org_id): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    state.require_organizations_enabled()?;

    let page = page.clamped();
    let departments = state
        .department_service
        .list_for_organization(&org_id, page.limit, page.offset)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        departments.iter().map(DepartmentResponse::from).collect(),
    ))
}

/// POST /api/organizations/{org_id}/departments
pub async fn create_department(
    State(state): State<AppState>,
    ctx: OrganizationContext,
    Path(org_id): Path<String>,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    state.require_organizations_enabled()?;

    debug!(user_id = %ctx.user.id(), org_id = %org_id, name = %request.name, "Creating department");

    let department = state
        .department_service
        .create(&org_id, &request.name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(DepartmentResponse::from(&department)))
}

/// GET /api/organizations/{org_id}/departments/{department_id}
///
/// Returns the organization and department together with the caller's
/// pre-resolved roles at both levels.
pub async fn get_department(
    State(state): State<AppState>,
    ctx: DepartmentContext,
    Path((org_id, department_id)): Path<(String, String)>,
) -> Result<Json<DepartmentDetailResponse>, ApiError> {
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

    let department = state
        .department_service
        .get(&department_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::from(DomainError::not_found(format!(
                "Department '{}' not found",
                department_id
            )))
        })?;

    Ok(Json(DepartmentDetailResponse {
        organization: OrganizationResponse::from(&organization),
        department: DepartmentResponse::from(&department),
        organization_role: ctx.organization_role,
        department_role: ctx.department_role,
    }))
}

/// GET /api/organizations/{org_id}/departments/{department_id}/users
pub async fn list_department_users(
    State(state): State<AppState>,
    _ctx: DepartmentContext,
    Path((_org_id, department_id)): Path<(String, String)>,
    Query(page): Query<Pagination>,
) -> Result<Json<DepartmentMembersResponse>, ApiError> {
    state.require_organizations_enabled()?;

    let page = page.clamped();
    let users = state
        .department_service
        .members(&department_id, page.limit, page.offset)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(DepartmentMembersResponse { users }))
}

/// POST /api/organizations/{org_id}/departments/{department_id}/users
pub async fn add_department_user(
    State(state): State<AppState>,
    _ctx: DepartmentContext,
    Path((_org_id, department_id)): Path<(String, String)>,
    Json(request): Json<AddUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    state
        .department_service
        .add_user(&department_id, &request.email, request.role)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "added": true })))
}

/// DELETE /api/organizations/{org_id}/departments/{department_id}/users/{user_id}
///
/// Also removes the user from every team of the department.
pub async fn remove_department_user(
    State(state): State<AppState>,
    _ctx: DepartmentContext,
    Path((_org_id, department_id, user_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    state
        .department_service
        .remove_user(&department_id, &user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
