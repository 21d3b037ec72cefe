//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresUserRepository` - Users and roles
//! - `PostgresRoleRequestRepository` - Pending manager requests
//! - `PostgresListingRepository` - Clubs and events
//! - `PostgresEntitlementRepository` - Paid records, unique per transaction
//! - `PostgresMembershipRepository` - Club memberships, unique per member
//!
//! Uniqueness-guarded inserts use `ON CONFLICT DO NOTHING` and report the
//! affected row count as a `SaveResult`.

mod entitlement_repository;
mod listing_repository;
mod membership_repository;
mod role_request_repository;
mod user_repository;

pub use entitlement_repository::PostgresEntitlementRepository;
pub use listing_repository::PostgresListingRepository;
pub use membership_repository::PostgresMembershipRepository;
pub use role_request_repository::PostgresRoleRequestRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Builds a connection pool from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Maps a stored value that fails domain parsing.
fn corrupt(column: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, e),
    )
}
