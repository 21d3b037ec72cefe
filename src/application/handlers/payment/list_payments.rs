//! ListPaymentsHandler - Query handler for recorded entitlements.

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::foundation::Email;
use crate::domain::payment::Entitlement;
use crate::ports::EntitlementRepository;

/// Whose payments to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPaymentsQuery {
    /// Payments made by one customer.
    Customer(Email),
    /// Every recorded payment (admin).
    All,
}

pub struct ListPaymentsHandler {
    entitlements: Arc<dyn EntitlementRepository>,
}

impl ListPaymentsHandler {
    pub fn new(entitlements: Arc<dyn EntitlementRepository>) -> Self {
        Self { entitlements }
    }

    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Entitlement>, ClubSphereError> {
        let records = match query {
            ListPaymentsQuery::Customer(email) => self.entitlements.list_by_customer(&email).await?,
            ListPaymentsQuery::All => self.entitlements.list_all().await?,
        };
        Ok(records)
    }
}
