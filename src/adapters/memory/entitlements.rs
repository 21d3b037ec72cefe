//! In-memory entitlement store, unique per transaction id.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, TransactionId};
use crate::domain::payment::Entitlement;
use crate::ports::{EntitlementRepository, SaveResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitlementRepository {
    records: Arc<RwLock<Vec<Entitlement>>>,
}

impl InMemoryEntitlementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of records for one transaction id; never more than one.
    pub async fn count_for(&self, transaction_id: &TransactionId) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| &r.transaction_id == transaction_id)
            .count()
    }
}

#[async_trait]
impl EntitlementRepository for InMemoryEntitlementRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Entitlement>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| &r.transaction_id == transaction_id)
            .cloned())
    }

    async fn insert(&self, entitlement: &Entitlement) -> Result<SaveResult, DomainError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.transaction_id == entitlement.transaction_id)
        {
            return Ok(SaveResult::AlreadyExists);
        }
        records.push(entitlement.clone());
        Ok(SaveResult::Inserted)
    }

    async fn list_by_customer(&self, customer: &Email) -> Result<Vec<Entitlement>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| &r.customer_email == customer)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Entitlement>, DomainError> {
        Ok(self.records.read().await.iter().rev().cloned().collect())
    }
}
