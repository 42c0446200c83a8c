use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{api_keys, departments, health, organizations, teams, users};

/// Create a minimal router without state (health probes only)
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Application API
        .nest("/api", api_router())
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn api_router() -> Router<AppState> {
    Router::new()
        // Authenticated user
        .route("/auth/user", get(users::current_user))
        // API key management
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route(
            "/api-keys/{key_id}",
            put(api_keys::update_api_key).delete(api_keys::delete_api_key),
        )
        // Organizations
        .route(
            "/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/organizations/{org_id}",
            get(organizations::get_organization),
        )
        .route(
            "/organizations/{org_id}/users",
            get(organizations::list_organization_users)
                .post(organizations::add_organization_user),
        )
        .route(
            "/organizations/{org_id}/users/{user_id}",
            delete(organizations::remove_organization_user),
        )
        // Departments
        .route(
            "/organizations/{org_id}/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}",
            get(departments::get_department),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}/users",
            get(departments::list_department_users).post(departments::add_department_user),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}/users/{user_id}",
            delete(departments::remove_department_user),
        )
        // Department teams
        .route(
            "/organizations/{org_id}/departments/{department_id}/teams",
            get(teams::list_teams).post(teams::create_team),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}/teams/{team_id}",
            get(teams::get_team),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}/teams/{team_id}/users",
            get(teams::list_team_users).post(teams::add_team_user),
        )
        .route(
            "/organizations/{org_id}/departments/{department_id}/teams/{team_id}/users/{user_id}",
            delete(teams::remove_team_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::FeaturesConfig;
    use crate::domain::user::{User, UserId, UserRepository};
    use crate::infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository};
    use crate::infrastructure::department::{DepartmentService, InMemoryDepartmentRepository};
    use crate::infrastructure::organization::{
        InMemoryOrganizationRepository, OrganizationService,
    };
    use crate::infrastructure::team::{InMemoryTeamRepository, TeamService};
    use crate::infrastructure::user::{InMemoryUserRepository, UserService};

    async fn test_state(organizations_enabled: bool) -> (AppState, String) {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .create(User::new(
                UserId::new("user-1").unwrap(),
                "Ada",
                "ada@example.com",
            ))
            .await
            .unwrap();

        let org_repo = Arc::new(InMemoryOrganizationRepository::new(users.clone()));
        let dept_repo = Arc::new(InMemoryDepartmentRepository::new(users.clone()));
        let team_repo = Arc::new(InMemoryTeamRepository::new(users.clone()));
        let api_key_service = Arc::new(ApiKeyService::new(
            Arc::new(InMemoryApiKeyRepository::new()),
            users.clone(),
        ));

        let created = api_key_service.create("user-1", "Test key").await.unwrap();

        let state = AppState::new(
            FeaturesConfig {
                organizations_enabled,
            },
            api_key_service,
            Arc::new(UserService::new(users.clone())),
            Arc::new(OrganizationService::new(org_repo.clone(), users.clone())),
            Arc::new(DepartmentService::new(
                dept_repo.clone(),
                org_repo.clone(),
                team_repo.clone(),
                users.clone(),
            )),
            Arc::new(TeamService::new(
                team_repo,
                dept_repo,
                org_repo,
                users,
            )),
        );

        (state, created.secret)
    }

    fn request(method: Method, uri: &str, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(secret) = secret {
            builder = builder.header("authorization", format!("Bearer {}", secret));
        }

        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _) = test_state(true).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_flag_rejects_every_hierarchy_endpoint() {
        let (state, secret) = test_state(false).await;
        let app = create_router_with_state(state);

        let endpoints = [
            (Method::GET, "/api/organizations/org-1/departments"),
            (Method::POST, "/api/organizations/org-1/departments"),
            (Method::GET, "/api/organizations/org-1/departments/dep-1"),
            (
                Method::GET,
                "/api/organizations/org-1/departments/dep-1/users",
            ),
            (
                Method::POST,
                "/api/organizations/org-1/departments/dep-1/users",
            ),
            (
                Method::DELETE,
                "/api/organizations/org-1/departments/dep-1/users/user-2",
            ),
            (
                Method::GET,
                "/api/organizations/org-1/departments/dep-1/teams",
            ),
            (
                Method::POST,
                "/api/organizations/org-1/departments/dep-1/teams",
            ),
            (
                Method::GET,
                "/api/organizations/org-1/departments/dep-1/teams/team-1",
            ),
            (
                Method::POST,
                "/api/organizations/org-1/departments/dep-1/teams/team-1/users",
            ),
            (
                Method::DELETE,
                "/api/organizations/org-1/departments/dep-1/teams/team-1/users/user-2",
            ),
        ];

        for (method, uri) in endpoints {
            let response = app
                .clone()
                .oneshot(request(method.clone(), uri, Some(&secret)))
                .await
                .unwrap();

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "expected 400 for {} {}",
                method,
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_disabled_flag_wins_even_without_auth() {
        let (state, _) = test_state(false).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/organizations/org-1/departments",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enabled_flag_requires_auth() {
        let (state, _) = test_state(true).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/organizations/org-1/departments",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_api_keys_listing_with_valid_key() {
        let (state, secret) = test_state(true).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(Method::GET, "/api/api-keys", Some(&secret)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_keys_listing_with_invalid_key_is_401() {
        let (state, _) = test_state(true).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/api-keys",
                Some("abcd1234.wrongsecret"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_user_endpoint() {
        let (state, secret) = test_state(true).await;
        let app = create_router_with_state(state);

        let response = app
            .oneshot(request(Method::GET, "/api/auth/user", Some(&secret)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
