//! Team endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::departments::DepartmentResponse;
use crate::api::middleware::{DepartmentContext, TeamContext};
use crate::api::organizations::{AddUserRequest, OrganizationResponse};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Pagination};
use crate::domain::role::Role;
use crate::domain::team::{Team, TeamMember};
use crate::domain::DomainError;

/// Request to create a team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Team response
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub department_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().as_str().to_string(),
            department_id: team.department_id().as_str().to_string(),
            name: team.name().to_string(),
            created_at: team.created_at().to_rfc3339(),
            updated_at: team.updated_at().to_rfc3339(),
        }
    }
}

/// Team detail with the caller's roles at all three levels
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetailResponse {
    pub organization: OrganizationResponse,
    pub department: DepartmentResponse,
    pub team: TeamResponse,
    pub organization_role: Role,
    pub department_role: Role,
    pub team_role: Role,
}

/// Member list response
#[derive(Debug, Clone, Serialize)]
pub struct TeamMembersResponse {
    pub users: Vec<TeamMember>,
}

/// GET /api/organizations/{org_id}/departments/{department_id}/teams
pub async fn list_teams(
    State(state): State<AppState>,
    _ctx: DepartmentContext,
    Path((_org_id, department_id)): Path<(String, String)>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    state.require_organizations_enabled()?;

    let page = page.clamped();
    let teams = state
        .team_service
        .list_for_department(&department_id, page.limit, page.offset)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// POST /api/organizations/{org_id}/departments/{department_id}/teams
pub async fn create_team(
    State(state): State<AppState>,
    ctx: DepartmentContext,
    Path((_org_id, department_id)): Path<(String, String)>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    state.require_organizations_enabled()?;

    debug!(user_id = %ctx.user.id(), department_id = %department_id, name = %request.name, "Creating team");

    let team = state
        .team_service
        .create(&department_id, &request.name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamResponse::from(&team)))
}

/// GET /api/organizations/{org_id}/departments/{department_id}/teams/{team_id}
///
/// Returns the whole hierarchy path together with the caller's
/// pre-resolved roles at every level.
pub async fn get_team(
    State(state): State<AppState>,
    ctx: TeamContext,
    Path((org_id, department_id, team_id)): Path<(String, String, String)>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
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

    let team = state
        .team_service
        .get(&team_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::from(DomainError::not_found(format!(
                "Team '{}' not found",
                team_id
            )))
        })?;

    Ok(Json(TeamDetailResponse {
        organization: OrganizationResponse::from(&organization),
        department: DepartmentResponse::from(&department),
        team: TeamResponse::from(&team),
        organization_role: ctx.organization_role,
        department_role: ctx.department_role,
        team_role: ctx.team_role,
    }))
}

/// GET /api/organizations/{org_id}/departments/{department_id}/teams/{team_id}/users
pub async fn list_team_users(
    State(state): State<AppState>,
    _ctx: TeamContext,
    Path((_org_id, _department_id, team_id)): Path<(String, String, String)>,
    Query(page): Query<Pagination>,
) -> Result<Json<TeamMembersResponse>, ApiError> {
    state.require_organizations_enabled()?;

    let page = page.clamped();
    let users = state
        .team_service
        .members(&team_id, page.limit, page.offset)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamMembersResponse { users }))
}

/// POST /api/organizations/{org_id}/departments/{department_id}/teams/{team_id}/users
///
/// The target user must already hold a role at the parent department,
/// otherwise the request is rejected with 401.
pub async fn add_team_user(
    State(state): State<AppState>,
    _ctx: DepartmentContext,
    Path((org_id, department_id, team_id)): Path<(String, String, String)>,
    Json(request): Json<AddUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    let user = state
        .user_service
        .get_by_email(&request.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::from(DomainError::not_found(format!(
                "User with email '{}' not found",
                request.email
            )))
        })?;

    let department_role = state
        .department_service
        .user_role(user.id().as_str(), &org_id, &department_id)
        .await
        .map_err(ApiError::from)?;

    if department_role.is_none() {
        return Err(ApiError::unauthorized("Department role required")
            .with_code("DEPARTMENT_USER_REQUIRED"));
    }

    state
        .team_service
        .add_user(&team_id, &request.email, request.role)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "added": true })))
}

/// DELETE /api/organizations/{org_id}/departments/{department_id}/teams/{team_id}/users/{user_id}
pub async fn remove_team_user(
    State(state): State<AppState>,
    _ctx: TeamContext,
    Path((_org_id, _department_id, team_id, user_id)): Path<(String, String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.require_organizations_enabled()?;

    state
        .team_service
        .remove_user(&team_id, &user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
