//! Hierarchy role context extractors
//!
//! Each extractor authenticates the caller, resolves their role at the
//! addressed hierarchy level from the path parameters, and rejects with
//! 401 when the role is missing. Handlers receive the roles pre-populated
//! and never re-run authorization themselves.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::auth::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::role::Role;
use crate::domain::user::User;

/// Caller context for organization-scoped endpoints
#[derive(Debug, Clone)]
pub struct OrganizationContext {
    pub user: User,
    pub organization_role: Role,
}

/// Caller context for department-scoped endpoints
#[derive(Debug, Clone)]
pub struct DepartmentContext {
    pub user: User,
    pub organization_role: Role,
    pub department_role: Role,
}

/// Caller context for team-scoped endpoints
#[derive(Debug, Clone)]
pub struct TeamContext {
    pub user: User,
    pub organization_role: Role,
    pub department_role: Role,
    pub team_role: Role,
}

impl FromRequestParts<AppState> for OrganizationContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.require_organizations_enabled()?;

        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        let params = path_params(parts, state).await?;
        let org_id = param(&params, "org_id")?;

        let organization_role = state
            .organization_service
            .user_role(user.id().as_str(), &org_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::unauthorized("Organization role required")
                    .with_code("ORGANIZATION_USER_REQUIRED")
            })?;

        Ok(OrganizationContext {
            user,
            organization_role,
        })
    }
}

impl FromRequestParts<AppState> for DepartmentContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.require_organizations_enabled()?;

        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        let params = path_params(parts, state).await?;
        let org_id = param(&params, "org_id")?;
        let department_id = param(&params, "department_id")?;

        let roles = state
            .department_service
            .user_role(user.id().as_str(), &org_id, &department_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::unauthorized("Department role required")
                    .with_code("DEPARTMENT_USER_REQUIRED")
            })?;

        Ok(DepartmentContext {
            user,
            organization_role: roles.organization_role,
            department_role: roles.department_role,
        })
    }
}

impl FromRequestParts<AppState> for TeamContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.require_organizations_enabled()?;

        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        let params = path_params(parts, state).await?;
        let org_id = param(&params, "org_id")?;
        let department_id = param(&params, "department_id")?;
        let team_id = param(&params, "team_id")?;

        let roles = state
            .team_service
            .user_roles(user.id().as_str(), &org_id, &department_id, &team_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::unauthorized("Team role required").with_code("TEAM_USER_REQUIRED")
            })?;

        Ok(TeamContext {
            user,
            organization_role: roles.organization_role,
            department_role: roles.department_role,
            team_role: roles.team_role,
        })
    }
}

async fn path_params(
    parts: &mut Parts,
    state: &AppState,
) -> Result<HashMap<String, String>, ApiError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::bad_request("Invalid path parameters"))?;

    Ok(params)
}

fn param(params: &HashMap<String, String>, name: &str) -> Result<String, ApiError> {
    params
        .get(name)
        .cloned()
        .ok_or_else(|| ApiError::bad_request(format!("Missing path parameter '{}'", name)))
}
