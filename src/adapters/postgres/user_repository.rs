//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Email, Role, Timestamp};
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::{corrupt, db_error};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    email: String,
    name: Option<String>,
    image: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            email: Email::new(&row.email).map_err(|e| corrupt("email", e))?,
            name: row.name,
            image: row.image,
            role: row.role.parse::<Role>().map_err(|e| corrupt("role", e))?,
            created_at: Timestamp::from_datetime(row.created_at),
            last_login: Timestamp::from_datetime(row.last_login),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT email, name, image, role, created_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn upsert_login(&self, user: &User) -> Result<User, DomainError> {
        // Role and created_at are written only on first insert.
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, name, image, role, created_at, last_login)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, users.name),
                image = COALESCE(EXCLUDED.image, users.image),
                last_login = EXCLUDED.last_login
            RETURNING email, name, image, role, created_at, last_login
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.as_str())
        .bind(user.created_at.as_datetime())
        .bind(user.last_login.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to upsert user", e))?;

        row.try_into()
    }

    async fn update_role(&self, email: &Email, role: Role) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE email = $1")
            .bind(email.as_str())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update role", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_except(&self, except: &Email) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT email, name, image, role, created_at, last_login
            FROM users
            WHERE email <> $1
            ORDER BY created_at DESC, email ASC
            "#,
        )
        .bind(except.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list users", e))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
