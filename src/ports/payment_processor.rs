//! Payment processor port for hosted checkout.
//!
//! Defines the contract for an external payment processor (e.g., Stripe).
//! The processor hosts the payment page, holds the session state, and signs
//! the webhooks it sends back.
//!
//! # Design
//!
//! - **One-time payments**: each checkout session charges a single line item
//! - **Metadata round trip**: the string map attached at creation comes back
//!   unchanged when the session is retrieved
//! - **Processor of record**: session status and payment intent are read
//!   from the processor, never trusted from the client

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::CheckoutStatus;

/// Port for payment processor integrations.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a hosted checkout session for a single line item.
    ///
    /// Returns the session id and the URL the customer is redirected to.
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Retrieve a checkout session by id.
    async fn retrieve_session(&self, session_id: &str) -> Result<ProcessorSession, PaymentError>;

    /// Verify a webhook signature and parse the event.
    fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> Result<ProcessorEvent, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    /// Line item display name.
    pub name: String,

    pub image: Option<String>,

    pub description: Option<String>,

    /// Unit price in minor currency units (cents).
    pub unit_amount_minor: i64,

    /// ISO currency code, lowercase.
    pub currency: String,

    /// Email pre-filled on the hosted page.
    pub customer_email: String,

    /// Attached to the session and returned on retrieval.
    pub metadata: HashMap<String, String>,

    /// Must contain the `{CHECKOUT_SESSION_ID}` placeholder.
    pub success_url: String,

    pub cancel_url: String,
}

/// Session created by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// Session state as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorSession {
    pub id: String,

    /// Payment intent id; becomes the transaction id of the record.
    pub payment_intent_id: Option<String>,

    pub status: CheckoutStatus,

    /// Amount charged in minor units, if the processor reports one.
    pub amount_total_minor: Option<i64>,

    pub metadata: HashMap<String, String>,
}

/// Webhook event from the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorEvent {
    /// Event ID from provider.
    pub id: String,

    pub kind: ProcessorEventKind,
}

/// Types of webhook events we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorEventKind {
    /// A checkout session finished; reconcile it.
    CheckoutCompleted { session_id: String },

    /// Anything else; acknowledged and ignored.
    Other(String),
}

/// Errors from payment processor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::NotFound => ErrorCode::NotFound,
            PaymentErrorCode::InvalidWebhook => ErrorCode::ValidationFailed,
            _ => ErrorCode::UpstreamPaymentError,
        };

        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
