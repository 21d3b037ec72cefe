//! ReconcilePaymentHandler - Records a paid entitlement from processor truth.
//!
//! Called twice for most payments: once by the client after the redirect and
//! once by the processor webhook. Both converge on one record per
//! transaction id.
//!
//! # Flow
//!
//! 1. Retrieve the session from the processor (failure -> upstream error)
//! 2. Take the payment intent id as the transaction id
//! 3. Fast path: return the existing record if one exists
//! 4. Status other than `complete` -> not complete, nothing written
//! 5. Resolve the listing named in metadata (a deleted listing is not fatal)
//! 6. Insert; a uniqueness conflict means another call won, return its record

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::foundation::{Money, TransactionId};
use crate::domain::payment::{CheckoutMetadata, Entitlement, ReconciliationOutcome};
use crate::ports::{EntitlementRepository, ListingRepository, PaymentProcessor, SaveResult};

/// Command to reconcile one checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePaymentCommand {
    pub session_id: String,
}

impl ReconcilePaymentCommand {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Handler for the Payment Reconciler.
pub struct ReconcilePaymentHandler {
    processor: Arc<dyn PaymentProcessor>,
    entitlements: Arc<dyn EntitlementRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl ReconcilePaymentHandler {
    pub fn new(
        processor: Arc<dyn PaymentProcessor>,
        entitlements: Arc<dyn EntitlementRepository>,
        listings: Arc<dyn ListingRepository>,
    ) -> Self {
        Self {
            processor,
            entitlements,
            listings,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcilePaymentCommand,
    ) -> Result<ReconciliationOutcome, ClubSphereError> {
        let session_id = cmd.session_id.trim();
        if session_id.is_empty() {
            return Err(ClubSphereError::validation(
                "sessionId",
                "Session reference is required",
            ));
        }

        // 1. Processor is the source of truth for payment state
        let session = self
            .processor
            .retrieve_session(session_id)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, error = %e, "Session retrieval failed");
                ClubSphereError::from(e)
            })?;

        // 2. No payment intent yet: nothing to key a record on
        let transaction_id = match session
            .payment_intent_id
            .as_deref()
            .map(TransactionId::new)
            .and_then(Result::ok)
        {
            Some(id) => id,
            None if session.status.is_complete() => {
                tracing::error!(session_id = %session_id, "Complete session has no payment intent");
                return Err(ClubSphereError::upstream(
                    "Processor reported a complete session without a payment intent",
                ));
            }
            None => {
                let outcome = ReconciliationOutcome::NotComplete {
                    transaction_id: None,
                    status: session.status,
                };
                log_outcome(session_id, &outcome);
                return Ok(outcome);
            }
        };

        // 3. Fast path; a store failure here must not fall through to insert
        if let Some(existing) = self
            .entitlements
            .find_by_transaction_id(&transaction_id)
            .await?
        {
            let outcome = ReconciliationOutcome::Duplicate(existing);
            log_outcome(session_id, &outcome);
            return Ok(outcome);
        }

        // 4. Never record a payment the processor has not captured
        if !session.status.is_complete() {
            let outcome = ReconciliationOutcome::NotComplete {
                transaction_id: Some(transaction_id),
                status: session.status,
            };
            log_outcome(session_id, &outcome);
            return Ok(outcome);
        }

        let metadata = CheckoutMetadata::from_map(&session.metadata).map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Session metadata unreadable");
            ClubSphereError::upstream(format!("Session metadata is invalid: {}", e))
                .with_transaction_id(transaction_id.clone())
        })?;

        let amount = session
            .amount_total_minor
            .map(Money::from_minor)
            .ok_or_else(|| {
                ClubSphereError::upstream("Processor reported no amount for a complete session")
                    .with_transaction_id(transaction_id.clone())
            })?;

        // 5. The listing may have been deleted since checkout
        let listing = self.listings.find_by_id(&metadata.target_id).await?;
        if listing.is_none() {
            tracing::warn!(
                transaction_id = %transaction_id,
                target_id = %metadata.target_id,
                "Purchased listing no longer exists; recording from metadata"
            );
        }

        // 6. The store's uniqueness constraint is the authoritative guard
        let entitlement = Entitlement::record(
            transaction_id.clone(),
            &metadata,
            listing.as_ref(),
            amount,
        );

        let outcome = match self.entitlements.insert(&entitlement).await? {
            SaveResult::Inserted => ReconciliationOutcome::Recorded(entitlement),
            SaveResult::AlreadyExists => {
                let existing = self
                    .entitlements
                    .find_by_transaction_id(&transaction_id)
                    .await?
                    .ok_or_else(|| {
                        ClubSphereError::store(format!(
                            "Payment {} conflicted on insert but cannot be read back",
                            transaction_id
                        ))
                    })?;
                ReconciliationOutcome::Duplicate(existing)
            }
        };

        log_outcome(session_id, &outcome);
        Ok(outcome)
    }
}

fn log_outcome(session_id: &str, outcome: &ReconciliationOutcome) {
    tracing::info!(
        session_id = %session_id,
        transaction_id = outcome.transaction_id().map(|t| t.as_str()).unwrap_or("-"),
        outcome = outcome.kind(),
        "Payment reconciled"
    );
}
