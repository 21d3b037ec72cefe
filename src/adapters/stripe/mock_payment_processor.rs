//! Mock payment processor for testing.
//!
//! Provides a configurable in-process implementation of `PaymentProcessor`
//! for unit and integration tests. Supports:
//! - Pre-configured sessions for retrieval
//! - Error injection
//! - Tracking of checkout requests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::payment::CheckoutStatus;
use crate::ports::{
    CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentProcessor, ProcessorEvent,
    ProcessorEventKind, ProcessorSession,
};

/// Mock payment processor for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProcessor::new();
/// mock.add_session(ProcessorSession { id: "cs_1".into(), ... });
///
/// let session = mock.retrieve_session("cs_1").await?;
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProcessor {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Sessions returned by `retrieve_session`, by id.
    sessions: HashMap<String, ProcessorSession>,

    /// Every request passed to `create_checkout_session`.
    created: Vec<CheckoutSessionRequest>,

    /// Error returned by every network call while set.
    error: Option<PaymentError>,

    retrieve_calls: usize,
}

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every processor call fail with `error`.
    pub fn with_error(self, error: PaymentError) -> Self {
        self.state().error = Some(error);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Registers a session for retrieval, replacing any session with the same id.
    pub fn add_session(&self, session: ProcessorSession) {
        self.state().sessions.insert(session.id.clone(), session);
    }

    pub fn set_error(&self, error: Option<PaymentError>) {
        self.state().error = error;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn created_requests(&self) -> Vec<CheckoutSessionRequest> {
        self.state().created.clone()
    }

    pub fn retrieve_calls(&self) -> usize {
        self.state().retrieve_calls
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        if let Some(error) = state.error.clone() {
            return Err(error);
        }

        let id = format!("cs_test_{}", state.created.len() + 1);
        state.sessions.insert(
            id.clone(),
            ProcessorSession {
                id: id.clone(),
                payment_intent_id: None,
                status: CheckoutStatus::Open,
                amount_total_minor: Some(request.unit_amount_minor),
                metadata: request.metadata.clone(),
            },
        );
        state.created.push(request);

        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/{}", id),
            id,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<ProcessorSession, PaymentError> {
        let mut state = self.state();
        state.retrieve_calls += 1;
        if let Some(error) = state.error.clone() {
            return Err(error);
        }

        state
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Checkout session"))
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<ProcessorEvent, PaymentError> {
        if signature == "invalid" {
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

        let id = value["id"].as_str().unwrap_or_default().to_string();
        let event_type = value["type"].as_str().unwrap_or_default();
        let kind = match (event_type, value["data"]["object"]["id"].as_str()) {
            ("checkout.session.completed", Some(session_id))
            | ("checkout.session.async_payment_succeeded", Some(session_id)) => {
                ProcessorEventKind::CheckoutCompleted {
                    session_id: session_id.to_string(),
                }
            }
            (other, _) => ProcessorEventKind::Other(other.to_string()),
        };

        Ok(ProcessorEvent { id, kind })
    }
}
