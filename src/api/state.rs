//! Application state for shared services

use std::sync::Arc;

use crate::api::types::ApiError;
use crate::config::FeaturesConfig;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::department::DepartmentService;
use crate::infrastructure::organization::OrganizationService;
use crate::infrastructure::team::TeamService;
use crate::infrastructure::user::UserService;

/// Application state containing shared services
///
/// Services are concrete types over `Arc<dyn Repository>` seams, so the
/// state itself stays cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub features: FeaturesConfig,
    pub api_key_service: Arc<ApiKeyService>,
    pub user_service: Arc<UserService>,
    pub organization_service: Arc<OrganizationService>,
    pub department_service: Arc<DepartmentService>,
    pub team_service: Arc<TeamService>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        features: FeaturesConfig,
        api_key_service: Arc<ApiKeyService>,
        user_service: Arc<UserService>,
        organization_service: Arc<OrganizationService>,
        department_service: Arc<DepartmentService>,
        team_service: Arc<TeamService>,
    ) -> Self {
        Self {
            features,
            api_key_service,
            user_service,
            organization_service,
            department_service,
            team_service,
        }
    }

    /// Reject the request when the organizations feature is disabled
    ///
    /// Checked before anything else in every hierarchy endpoint so the
    /// flag wins regardless of auth, path or body problems.
    pub fn require_organizations_enabled(&self) -> Result<(), ApiError> {
        if !self.features.organizations_enabled {
            return Err(ApiError::organizations_disabled());
        }

        Ok(())
    }
}
