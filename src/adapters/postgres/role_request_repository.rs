//! PostgreSQL implementation of RoleRequestRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Email, Role, Timestamp};
use crate::domain::user::RoleChangeRequest;
use crate::ports::{RoleRequestRepository, SaveResult};

use super::{corrupt, db_error};

pub struct PostgresRoleRequestRepository {
    pool: PgPool,
}

impl PostgresRoleRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRequestRow {
    email: String,
    requested_role: String,
    requested_at: DateTime<Utc>,
}

impl TryFrom<RoleRequestRow> for RoleChangeRequest {
    type Error = DomainError;

    fn try_from(row: RoleRequestRow) -> Result<Self, Self::Error> {
        Ok(RoleChangeRequest {
            email: Email::new(&row.email).map_err(|e| corrupt("email", e))?,
            requested_role: row
                .requested_role
                .parse::<Role>()
                .map_err(|e| corrupt("requested_role", e))?,
            requested_at: Timestamp::from_datetime(row.requested_at),
        })
    }
}

#[async_trait]
impl RoleRequestRepository for PostgresRoleRequestRepository {
    async fn insert(&self, request: &RoleChangeRequest) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO role_requests (email, requested_role, requested_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(request.email.as_str())
        .bind(request.requested_role.as_str())
        .bind(request.requested_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save role request", e))?;

        Ok(SaveResult::from_rows_affected(result.rows_affected()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<RoleChangeRequest>, DomainError> {
        let row: Option<RoleRequestRow> = sqlx::query_as(
            "SELECT email, requested_role, requested_at FROM role_requests WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch role request", e))?;

        row.map(RoleChangeRequest::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<RoleChangeRequest>, DomainError> {
        let rows: Vec<RoleRequestRow> = sqlx::query_as(
            r#"
            SELECT email, requested_role, requested_at
            FROM role_requests
            ORDER BY requested_at ASC, email ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list role requests", e))?;

        rows.into_iter().map(RoleChangeRequest::try_from).collect()
    }

    async fn delete(&self, email: &Email) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM role_requests WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete role request", e))?;

        Ok(result.rows_affected() > 0)
    }
}
