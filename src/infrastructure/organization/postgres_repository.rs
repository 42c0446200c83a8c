//! PostgreSQL organization repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::organization::{
    Organization, OrganizationId, OrganizationMember, OrganizationRepository, UserOrganization,
};
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of OrganizationRepository
#[derive(Debug, Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn get(&self, id: &OrganizationId) -> Result<Option<Organization>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get organization: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_organization(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        organization: Organization,
        creator: &UserId,
    ) -> Result<Organization, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(organization.id().as_str())
        .bind(organization.name())
        .bind(organization.created_at())
        .bind(organization.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Organization '{}' already exists",
                    organization.id()
                ))
            } else {
                DomainError::storage(format!("Failed to create organization: {}", e))
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO organization_users (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(organization.id().as_str())
        .bind(creator.as_str())
        .bind(Role::Admin.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add creator membership: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(organization)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserOrganization>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.name, o.created_at, o.updated_at, ou.role
            FROM organization_users ou
            JOIN organizations o ON o.id = ou.organization_id
            WHERE ou.user_id = $1
            ORDER BY o.created_at
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list organizations: {}", e)))?;

        let mut result = Vec::with_capacity(rows.len());

        for row in rows {
            let role: String = row.get("role");
            result.push(UserOrganization {
                organization: row_to_organization(&row)?,
                role: parse_role(&role),
            });
        }

        Ok(result)
    }

    async fn members(
        &self,
        id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrganizationMember>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT ou.user_id, u.name, u.email, ou.role
            FROM organization_users ou
            JOIN users u ON u.id = ou.user_id
            WHERE ou.organization_id = $1
            ORDER BY u.name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list organization members: {}", e)))?;

        let mut result = Vec::with_capacity(rows.len());

        for row in rows {
            let user_id: String = row.get("user_id");
            let role: String = row.get("role");

            result.push(OrganizationMember {
                user_id: UserId::new(&user_id).map_err(|e| {
                    DomainError::storage(format!("Invalid user ID in database: {}", e))
                })?,
                name: row.get("name"),
                email: row.get("email"),
                role: parse_role(&role),
            });
        }

        Ok(result)
    }

    async fn add_member(
        &self,
        id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO organization_users (organization_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (organization_id, user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add organization member: {}", e)))?;

        Ok(())
    }

    async fn remove_member(
        &self,
        id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM organization_users WHERE organization_id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to remove organization member: {}", e))
            })?;

        Ok(())
    }

    async fn member_role(
        &self,
        user_id: &UserId,
        id: &OrganizationId,
    ) -> Result<Option<Role>, DomainError> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM organization_users WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get organization role: {}", e)))?;

        Ok(role.map(|r| parse_role(&r)))
    }
}

fn row_to_organization(row: &sqlx::postgres::PgRow) -> Result<Organization, DomainError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let org_id = OrganizationId::new(&id).map_err(|e| {
        DomainError::storage(format!("Invalid organization ID in database: {}", e))
    })?;

    Ok(Organization::restore(org_id, name, created_at, updated_at))
}

/// Stored roles are written by us, so unknown values degrade to MEMBER
fn parse_role(value: &str) -> Role {
    value.parse().unwrap_or_default()
}
