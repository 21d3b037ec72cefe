//! Entitlement store port.
//!
//! Stores paid entitlement records. Records are append-only: the reconciler
//! inserts each at most once per transaction id, and nothing updates or
//! deletes them.
//!
//! ## Why the insert reports conflicts
//!
//! Two reconciliation calls for the same transaction can both miss the
//! `find_by_transaction_id` fast path before either inserts. Implementations
//! MUST enforce uniqueness of `transaction_id` at the store and report the
//! losing insert as `SaveResult::AlreadyExists`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Email, TransactionId};
use crate::domain::payment::Entitlement;

use super::SaveResult;

#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Entitlement>, DomainError>;

    /// Inserts the record unless one with the same transaction id exists.
    async fn insert(&self, entitlement: &Entitlement) -> Result<SaveResult, DomainError>;

    /// Records paid by `customer`, newest first.
    async fn list_by_customer(&self, customer: &Email) -> Result<Vec<Entitlement>, DomainError>;

    /// All records, newest first.
    async fn list_all(&self) -> Result<Vec<Entitlement>, DomainError>;
}
