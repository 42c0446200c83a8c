//! Authenticated-user endpoint

use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;

/// User response, profile fields only
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            verified: user.verified(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// GET /api/auth/user
///
/// Resolves the presented API key to its owning user.
pub async fn current_user(RequireUser(user): RequireUser) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    #[test]
    fn test_user_response_from_user() {
        let user = User::new(UserId::new("user-1").unwrap(), "Ada", "Ada@Example.com");

        let response = UserResponse::from(&user);
        assert_eq!(response.id, "user-1");
        assert_eq!(response.email, "ada@example.com");
        assert!(!response.verified);
    }
}
