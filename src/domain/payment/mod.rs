//! Payment module - purchases, processor metadata and recorded entitlements.

mod entitlement;
mod metadata;
mod purchase;
mod reconciliation;

pub use entitlement::{Entitlement, PaymentStatus, TargetSnapshot};
pub use metadata::CheckoutMetadata;
pub use purchase::PurchaseRequest;
pub use reconciliation::{
    CheckoutStatus, ReconciliationOutcome, MSG_DUPLICATE, MSG_NOT_COMPLETE, MSG_RECORDED,
};
