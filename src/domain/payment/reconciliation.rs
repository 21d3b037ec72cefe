//! Outcome of reconciling a processor session against local records.

use std::fmt;

use crate::domain::foundation::TransactionId;

use super::Entitlement;

/// Processor-reported state of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStatus {
    Open,
    Complete,
    Expired,
    Other(String),
}

impl CheckoutStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "open" => CheckoutStatus::Open,
            "complete" => CheckoutStatus::Complete,
            "expired" => CheckoutStatus::Expired,
            other => CheckoutStatus::Other(other.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CheckoutStatus::Complete)
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStatus::Open => write!(f, "open"),
            CheckoutStatus::Complete => write!(f, "complete"),
            CheckoutStatus::Expired => write!(f, "expired"),
            CheckoutStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

pub const MSG_RECORDED: &str = "Payment recorded.";
pub const MSG_DUPLICATE: &str = "Payment already recorded.";
pub const MSG_NOT_COMPLETE: &str = "Payment not complete.";

/// Result of one reconciliation call.
///
/// `Recorded` is the only variant that wrote anything. `Duplicate` returns the
/// record written by an earlier call. `NotComplete` leaves the store untouched
/// so a later call may still record the payment.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationOutcome {
    Recorded(Entitlement),
    Duplicate(Entitlement),
    NotComplete {
        transaction_id: Option<TransactionId>,
        status: CheckoutStatus,
    },
}

impl ReconciliationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ReconciliationOutcome::Recorded(_) => MSG_RECORDED,
            ReconciliationOutcome::Duplicate(_) => MSG_DUPLICATE,
            ReconciliationOutcome::NotComplete { .. } => MSG_NOT_COMPLETE,
        }
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            ReconciliationOutcome::Recorded(e) | ReconciliationOutcome::Duplicate(e) => {
                Some(&e.transaction_id)
            }
            ReconciliationOutcome::NotComplete { transaction_id, .. } => transaction_id.as_ref(),
        }
    }

    pub fn entitlement(&self) -> Option<&Entitlement> {
        match self {
            ReconciliationOutcome::Recorded(e) | ReconciliationOutcome::Duplicate(e) => Some(e),
            ReconciliationOutcome::NotComplete { .. } => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, ReconciliationOutcome::Duplicate(_))
    }

    /// Short label used in logs and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ReconciliationOutcome::Recorded(_) => "recorded",
            ReconciliationOutcome::Duplicate(_) => "duplicate",
            ReconciliationOutcome::NotComplete { .. } => "not_complete",
        }
    }
}
