//! User service

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{
    validate_user_email, validate_user_name, User, UserId, UserRepository,
};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Service for user lookup and creation
///
/// Registration, verification mail and profile flows live outside this
/// service; this covers what authentication and membership management need.
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email).await
    }

    /// Create a new user with a generated ID
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_user_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_user_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        let id = UserId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(user_id = %id, "Creating user");

        self.repository
            .create(User::new(id, &request.name, &request.email))
            .await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::InMemoryUserRepository;

    fn create_service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_create_user_generates_id() {
        let service = create_service();

        let user = service
            .create(CreateUserRequest {
                name: "Ada".to_string(),
                email: "Ada@Example.com".to_string(),
            })
            .await
            .unwrap();

        assert!(!user.id().as_str().is_empty());
        assert_eq!(user.email(), "ada@example.com");

        let fetched = service.get(user.id().as_str()).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let service = create_service();

        let result = service
            .create(CreateUserRequest {
                name: "Ada".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let service = create_service();

        service
            .create(CreateUserRequest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap();

        let fetched = service.get_by_email("ada@example.com").await.unwrap();
        assert!(fetched.is_some());

        let missing = service.get_by_email("none@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let service = create_service();
        assert_eq!(service.count().await.unwrap(), 0);

        service
            .create(CreateUserRequest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.count().await.unwrap(), 1);
    }
}
