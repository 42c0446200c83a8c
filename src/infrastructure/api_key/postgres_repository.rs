//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ApiKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, name, user_id, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(api_key.id().as_str())
        .bind(api_key.name())
        .bind(api_key.user_id().as_str())
        .bind(api_key.is_active())
        .bind(api_key.created_at())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "API key with prefix '{}' already exists",
                    api_key.prefix()
                ))
            } else {
                DomainError::storage(format!("Failed to create API key: {}", e))
            }
        })?;

        Ok(api_key)
    }

    async fn get_active(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, user_id, active, created_at, updated_at
            FROM api_keys
            WHERE id = $1 AND active = TRUE
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_api_key(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, user_id, active, created_at, updated_at
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        let mut keys = Vec::with_capacity(rows.len());

        for row in rows {
            keys.push(row_to_api_key(&row)?);
        }

        Ok(keys)
    }

    async fn set_active(
        &self,
        user_id: &UserId,
        id: &ApiKeyId,
        active: bool,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET active = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .bind(active)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update API key: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id.prefix()
            )));
        }

        Ok(())
    }

    async fn delete(&self, user_id: &UserId, id: &ApiKeyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_api_key(row: &sqlx::postgres::PgRow) -> Result<ApiKey, DomainError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let user_id: String = row.get("user_id");
    let active: bool = row.get("active");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let key_id = ApiKeyId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid API key ID in database: {}", e)))?;
    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(ApiKey::restore(
        key_id, name, user_id, active, created_at, updated_at,
    ))
}
