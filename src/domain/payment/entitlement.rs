//! Paid entitlement records.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Listing, ListingKind, ListingStatus};
use crate::domain::foundation::{
    Email, EntitlementId, ListingId, Money, Timestamp, TransactionId,
};

use super::CheckoutMetadata;

/// Payment state of a recorded entitlement. Only captured payments are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Copy of the purchased listing as it was at payment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSnapshot {
    pub id: ListingId,
    pub kind: ListingKind,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub price_minor: i64,
    pub manager_email: String,
    pub status: ListingStatus,
}

impl From<&Listing> for TargetSnapshot {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.clone(),
            kind: listing.kind,
            name: listing.name.clone(),
            description: listing.description.clone(),
            image: listing.image.clone(),
            category: listing.category.clone(),
            location: listing.location.clone(),
            price_minor: listing.price.minor_units(),
            manager_email: listing.manager_email.to_string(),
            status: listing.status,
        }
    }
}

/// A completed payment, recorded exactly once per transaction id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub id: EntitlementId,
    pub transaction_id: TransactionId,
    pub customer_email: Email,
    pub target_id: ListingId,
    pub purchase_type: ListingKind,
    pub name: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub status: PaymentStatus,
    pub target: Option<TargetSnapshot>,
    pub amount: Money,
    pub paid_at: Timestamp,
}

impl Entitlement {
    /// Builds the record for a captured payment.
    ///
    /// `target` is `None` when the listing was deleted after checkout; the
    /// record then relies on the metadata alone.
    pub fn record(
        transaction_id: TransactionId,
        metadata: &CheckoutMetadata,
        target: Option<&Listing>,
        amount: Money,
    ) -> Self {
        let snapshot = target.map(TargetSnapshot::from);
        let name = snapshot
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| metadata.target_name.clone());
        let image = snapshot.as_ref().and_then(|s| s.image.clone());
        let category = snapshot
            .as_ref()
            .and_then(|s| s.category.clone())
            .or_else(|| metadata.declared_category.clone());

        Self {
            id: EntitlementId::new(),
            transaction_id,
            customer_email: metadata.customer_email.clone(),
            target_id: metadata.target_id.clone(),
            purchase_type: metadata.purchase_type,
            name,
            image,
            category,
            status: PaymentStatus::Paid,
            target: snapshot,
            amount,
            paid_at: Timestamp::now(),
        }
    }
}
