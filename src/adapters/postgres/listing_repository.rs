//! PostgreSQL implementation of ListingRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::catalog::{Listing, ListingKind, ListingStatus};
use crate::domain::foundation::{DomainError, Email, ErrorCode, ListingId, Money, Timestamp};
use crate::ports::{ListingQuery, ListingRepository};

use super::{corrupt, db_error};

const SELECT_COLUMNS: &str = r#"
    SELECT id, kind, name, description, image, category, location, price_minor,
           manager_email, status, created_at
    FROM listings
"#;

pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: String,
    kind: String,
    name: String,
    description: Option<String>,
    image: Option<String>,
    category: Option<String>,
    location: Option<String>,
    price_minor: i64,
    manager_email: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = DomainError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: ListingId::parse(row.id).map_err(|e| corrupt("id", e))?,
            kind: row.kind.parse::<ListingKind>().map_err(|e| corrupt("kind", e))?,
            name: row.name,
            description: row.description,
            image: row.image,
            category: row.category,
            location: row.location,
            price: Money::from_minor(row.price_minor),
            manager_email: Email::new(&row.manager_email)
                .map_err(|e| corrupt("manager_email", e))?,
            status: row
                .status
                .parse::<ListingStatus>()
                .map_err(|e| corrupt("status", e))?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// `LIKE` pattern matching `search` anywhere, with wildcards escaped.
fn contains_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, kind, name, description, image, category, location, price_minor,
                manager_email, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(listing.id.as_str())
        .bind(listing.kind.as_str())
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(&listing.image)
        .bind(&listing.category)
        .bind(&listing.location)
        .bind(listing.price.minor_units())
        .bind(listing.manager_email.as_str())
        .bind(listing.status.as_str())
        .bind(listing.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("listings_pkey") {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        format!("Listing {} already exists", listing.id),
                    );
                }
            }
            db_error("Failed to save listing", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        let row: Option<ListingRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch listing", e))?;

        row.map(Listing::try_from).transpose()
    }

    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DomainError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE kind = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text IS NULL OR name ILIKE $4)
            ORDER BY created_at DESC
            LIMIT $5
            "#,
            SELECT_COLUMNS
        ))
        .bind(query.kind.as_str())
        .bind(query.status.map(|s| s.as_str()))
        .bind(&query.category)
        .bind(query.search.as_deref().map(contains_pattern))
        .bind(i64::from(query.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to search listings", e))?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn list_by_manager(&self, manager: &Email) -> Result<Vec<Listing>, DomainError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            "{} WHERE manager_email = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(manager.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list listings", e))?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE listings SET status = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update listing status", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete listing", e))?;

        Ok(result.rows_affected() > 0)
    }
}
