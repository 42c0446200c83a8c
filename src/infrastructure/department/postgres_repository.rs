//! PostgreSQL department repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::department::{Department, DepartmentId, DepartmentMember, DepartmentRepository};
use crate::domain::organization::OrganizationId;
use crate::domain::role::Role;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of DepartmentRepository
#[derive(Debug, Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn get(&self, id: &DepartmentId) -> Result<Option<Department>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, organization_id, name, created_at, updated_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get department: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_department(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, department: Department) -> Result<Department, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, organization_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(department.id().as_str())
        .bind(department.organization_id().as_str())
        .bind(department.name())
        .bind(department.created_at())
        .bind(department.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Department '{}' already exists",
                    department.id()
                ))
            } else {
                DomainError::storage(format!("Failed to create department: {}", e))
            }
        })?;

        Ok(department)
    }

    async fn list_for_organization(
        &self,
        organization_id: &OrganizationId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Department>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, organization_id, name, created_at, updated_at
            FROM departments
            WHERE organization_id = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(organization_id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list departments: {}", e)))?;

        let mut departments = Vec::with_capacity(rows.len());

        for row in rows {
            departments.push(row_to_department(&row)?);
        }

        Ok(departments)
    }

    async fn members(
        &self,
        id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DepartmentMember>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT du.user_id, u.name, u.email, du.role
            FROM department_users du
            JOIN users u ON u.id = du.user_id
            WHERE du.department_id = $1
            ORDER BY u.name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list department members: {}", e)))?;

        let mut result = Vec::with_capacity(rows.len());

        for row in rows {
            let user_id: String = row.get("user_id");
            let role: String = row.get("role");

            result.push(DepartmentMember {
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
        id: &DepartmentId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO department_users (department_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (department_id, user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add department member: {}", e)))?;

        Ok(())
    }

    async fn remove_member(&self, id: &DepartmentId, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM department_users WHERE department_id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to remove department member: {}", e))
            })?;

        Ok(())
    }

    async fn member_role(
        &self,
        user_id: &UserId,
        id: &DepartmentId,
    ) -> Result<Option<Role>, DomainError> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM department_users WHERE department_id = $1 AND user_id = $2",
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get department role: {}", e)))?;

        Ok(role.map(|r| parse_role(&r)))
    }
}

/// Stored roles are written by us, so unknown values degrade to MEMBER
fn parse_role(value: &str) -> Role {
    value.parse().unwrap_or_default()
}

fn row_to_department(row: &sqlx::postgres::PgRow) -> Result<Department, DomainError> {
    let id: String = row.get("id");
    let organization_id: String = row.get("organization_id");
    let name: String = row.get("name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let department_id = DepartmentId::new(&id).map_err(|e| {
        DomainError::storage(format!("Invalid department ID in database: {}", e))
    })?;
    let organization_id = OrganizationId::new(&organization_id).map_err(|e| {
        DomainError::storage(format!("Invalid organization ID in database: {}", e))
    })?;

    Ok(Department::restore(
        department_id,
        organization_id,
        name,
        created_at,
        updated_at,
    ))
}
