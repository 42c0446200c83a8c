//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::department::DepartmentId;
use crate::domain::role::Role;
use crate::domain::team::{Team, TeamId, TeamMember, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, department_id, name, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, department_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(team.id().as_str())
        .bind(team.department_id().as_str())
        .bind(team.name())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Team '{}' already exists", team.id()))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        Ok(team)
    }

    async fn list_for_department(
        &self,
        department_id: &DepartmentId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, department_id, name, created_at, updated_at
            FROM teams
            WHERE department_id = $1
            ORDER BY created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(department_id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        let mut teams = Vec::with_capacity(rows.len());

        for row in rows {
            teams.push(row_to_team(&row)?);
        }

        Ok(teams)
    }

    async fn members(
        &self,
        id: &TeamId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TeamMember>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT tu.user_id, u.name, u.email, tu.role
            FROM team_users tu
            JOIN users u ON u.id = tu.user_id
            WHERE tu.team_id = $1
            ORDER BY u.name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(id.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team members: {}", e)))?;

        let mut result = Vec::with_capacity(rows.len());

        for row in rows {
            let user_id: String = row.get("user_id");
            let role: String = row.get("role");

            result.push(TeamMember {
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
        id: &TeamId,
        user_id: &UserId,
        role: Role,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO team_users (team_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add team member: {}", e)))?;

        Ok(())
    }

    async fn remove_member(&self, id: &TeamId, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM team_users WHERE team_id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to remove team member: {}", e)))?;

        Ok(())
    }

    async fn remove_member_for_department(
        &self,
        department_id: &DepartmentId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM team_users
            WHERE user_id = $2
              AND team_id IN (SELECT id FROM teams WHERE department_id = $1)
            "#,
        )
        .bind(department_id.as_str())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to remove department team memberships: {}", e))
        })?;

        Ok(())
    }

    async fn member_role(
        &self,
        user_id: &UserId,
        id: &TeamId,
    ) -> Result<Option<Role>, DomainError> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM team_users WHERE team_id = $1 AND user_id = $2")
                .bind(id.as_str())
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to get team role: {}", e)))?;

        Ok(role.map(|r| parse_role(&r)))
    }
}

/// Stored roles are written by us, so unknown values degrade to MEMBER
fn parse_role(value: &str) -> Role {
    value.parse().unwrap_or_default()
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let id: String = row.get("id");
    let department_id: String = row.get("department_id");
    let name: String = row.get("name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let team_id = TeamId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;
    let department_id = DepartmentId::new(&department_id).map_err(|e| {
        DomainError::storage(format!("Invalid department ID in database: {}", e))
    })?;

    Ok(Team::restore(
        team_id,
        department_id,
        name,
        created_at,
        updated_at,
    ))
}
