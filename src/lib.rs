//! Pointdeck backend
//!
//! Planning poker collaboration backend covering:
//! - API key lifecycle (generation, listing, toggling, deletion) and
//!   API-key authentication
//! - Organization -> Department -> Team tenancy hierarchy with
//!   per-level membership roles

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::api_key::ApiKeyRepository;
use domain::department::DepartmentRepository;
use domain::organization::OrganizationRepository;
use domain::team::TeamRepository;
use domain::user::{User, UserRepository};
use infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository};
use infrastructure::department::{
    DepartmentService, InMemoryDepartmentRepository, PostgresDepartmentRepository,
};
use infrastructure::organization::{
    InMemoryOrganizationRepository, OrganizationService, PostgresOrganizationRepository,
};
use infrastructure::postgres::{self, PostgresConfig};
use infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository, TeamService};
use infrastructure::user::{
    CreateUserRequest, InMemoryUserRepository, PostgresUserRepository, UserService,
};

type Repositories = (
    Arc<dyn UserRepository>,
    Arc<dyn ApiKeyRepository>,
    Arc<dyn OrganizationRepository>,
    Arc<dyn DepartmentRepository>,
    Arc<dyn TeamRepository>,
);

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let (users, api_keys, organizations, departments, teams) =
        create_repositories(config).await?;

    let user_service = Arc::new(UserService::new(users.clone()));
    let api_key_service = Arc::new(ApiKeyService::new(api_keys, users.clone()));
    let organization_service = Arc::new(OrganizationService::new(
        organizations.clone(),
        users.clone(),
    ));
    let department_service = Arc::new(DepartmentService::new(
        departments.clone(),
        organizations.clone(),
        teams.clone(),
        users.clone(),
    ));
    let team_service = Arc::new(TeamService::new(teams, departments, organizations, users));

    // Bootstrap an initial user (and optionally an API key for it) so a
    // fresh deployment is reachable.
    if let Some(admin) = create_initial_user(user_service.as_ref()).await? {
        if let Ok(admin_key) = std::env::var("ADMIN_API_KEY") {
            create_admin_api_key(api_key_service.as_ref(), &admin, &admin_key).await?;
        }
    }

    Ok(AppState::new(
        config.features.clone(),
        api_key_service,
        user_service,
        organization_service,
        department_service,
        team_service,
    ))
}

async fn create_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    let use_postgres = config.storage.backend.eq_ignore_ascii_case("postgres");

    if use_postgres {
        info!("Using PostgreSQL storage");

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            anyhow::anyhow!("DATABASE_URL environment variable is required for postgres storage")
        })?;

        let pool = postgres::connect(&PostgresConfig::new(database_url)).await?;
        postgres::ensure_schema(&pool).await?;
        info!("PostgreSQL connection established");

        Ok((
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresApiKeyRepository::new(pool.clone())),
            Arc::new(PostgresOrganizationRepository::new(pool.clone())),
            Arc::new(PostgresDepartmentRepository::new(pool.clone())),
            Arc::new(PostgresTeamRepository::new(pool)),
        ))
    } else {
        info!("Using in-memory storage");

        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());

        Ok((
            users.clone(),
            Arc::new(InMemoryApiKeyRepository::new()),
            Arc::new(InMemoryOrganizationRepository::new(users.clone())),
            Arc::new(InMemoryDepartmentRepository::new(users.clone())),
            Arc::new(InMemoryTeamRepository::new(users)),
        ))
    }
}

/// Create an initial user when the store is empty
async fn create_initial_user(user_service: &UserService) -> anyhow::Result<Option<User>> {
    if user_service.count().await? > 0 {
        return Ok(None);
    }

    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());

    let user = user_service
        .create(CreateUserRequest {
            name,
            email: email.clone(),
        })
        .await?;

    info!("===========================================");
    info!("Initial user created!");
    info!("Email: {}", email);
    info!("===========================================");

    Ok(Some(user))
}

/// Provision an API key with a known secret for the initial user
async fn create_admin_api_key(
    api_key_service: &ApiKeyService,
    user: &User,
    key_value: &str,
) -> anyhow::Result<()> {
    let created = api_key_service
        .create_with_secret(user.id().as_str(), "Admin key", key_value)
        .await?;

    info!(prefix = %created.api_key.prefix(), "Admin API key created");
    Ok(())
}
