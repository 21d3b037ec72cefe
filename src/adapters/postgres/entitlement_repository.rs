//! PostgreSQL implementation of EntitlementRepository.
//!
//! The `payments_transaction_id_key` unique constraint decides which of two
//! concurrent reconciliations records the payment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::ListingKind;
use crate::domain::foundation::{
    DomainError, Email, EntitlementId, ListingId, Money, Timestamp, TransactionId,
};
use crate::domain::payment::{Entitlement, PaymentStatus, TargetSnapshot};
use crate::ports::{EntitlementRepository, SaveResult};

use super::{corrupt, db_error};

const SELECT_COLUMNS: &str = r#"
    SELECT id, transaction_id, customer_email, target_id, purchase_type, name, image,
           category, status, target, amount_minor, paid_at
    FROM payments
"#;

pub struct PostgresEntitlementRepository {
    pool: PgPool,
}

impl PostgresEntitlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    transaction_id: String,
    customer_email: String,
    target_id: String,
    purchase_type: String,
    name: String,
    image: Option<String>,
    category: Option<String>,
    status: String,
    target: Option<Json<TargetSnapshot>>,
    amount_minor: i64,
    paid_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Entitlement {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        if row.status != PaymentStatus::Paid.as_str() {
            return Err(corrupt("status", &row.status));
        }

        Ok(Entitlement {
            id: EntitlementId::from_uuid(row.id),
            transaction_id: TransactionId::new(row.transaction_id)
                .map_err(|e| corrupt("transaction_id", e))?,
            customer_email: Email::new(&row.customer_email)
                .map_err(|e| corrupt("customer_email", e))?,
            target_id: ListingId::parse(row.target_id).map_err(|e| corrupt("target_id", e))?,
            purchase_type: row
                .purchase_type
                .parse::<ListingKind>()
                .map_err(|e| corrupt("purchase_type", e))?,
            name: row.name,
            image: row.image,
            category: row.category,
            status: PaymentStatus::Paid,
            target: row.target.map(|Json(snapshot)| snapshot),
            amount: Money::from_minor(row.amount_minor),
            paid_at: Timestamp::from_datetime(row.paid_at),
        })
    }
}

#[async_trait]
impl EntitlementRepository for PostgresEntitlementRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row: Option<PaymentRow> =
            sqlx::query_as(&format!("{} WHERE transaction_id = $1", SELECT_COLUMNS))
                .bind(transaction_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch payment", e))?;

        row.map(Entitlement::try_from).transpose()
    }

    async fn insert(&self, entitlement: &Entitlement) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                id, transaction_id, customer_email, target_id, purchase_type, name, image,
                category, status, target, amount_minor, paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(entitlement.id.as_uuid())
        .bind(entitlement.transaction_id.as_str())
        .bind(entitlement.customer_email.as_str())
        .bind(entitlement.target_id.as_str())
        .bind(entitlement.purchase_type.as_str())
        .bind(&entitlement.name)
        .bind(&entitlement.image)
        .bind(&entitlement.category)
        .bind(entitlement.status.as_str())
        .bind(entitlement.target.as_ref().map(Json))
        .bind(entitlement.amount.minor_units())
        .bind(entitlement.paid_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save payment", e))?;

        let outcome = SaveResult::from_rows_affected(result.rows_affected());
        if outcome == SaveResult::AlreadyExists {
            tracing::debug!(
                transaction_id = %entitlement.transaction_id,
                "Payment insert lost the uniqueness race"
            );
        }
        Ok(outcome)
    }

    async fn list_by_customer(&self, customer: &Email) -> Result<Vec<Entitlement>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{} WHERE customer_email = $1 ORDER BY paid_at DESC",
            SELECT_COLUMNS
        ))
        .bind(customer.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list payments", e))?;

        rows.into_iter().map(Entitlement::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Entitlement>, DomainError> {
        let rows: Vec<PaymentRow> =
            sqlx::query_as(&format!("{} ORDER BY paid_at DESC", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to list payments", e))?;

        rows.into_iter().map(Entitlement::try_from).collect()
    }
}
