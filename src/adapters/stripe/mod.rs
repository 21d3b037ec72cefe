//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` port for Stripe hosted checkout:
//! - One-time payment checkout sessions
//! - Session retrieval for reconciliation
//! - Webhook signature verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `CLUB_SPHERE__PAYMENT__STRIPE_API_KEY`: Stripe secret API key
//! - `CLUB_SPHERE__PAYMENT__STRIPE_WEBHOOK_SECRET`: Webhook signing secret (whsec_...)

mod mock_payment_processor;
mod stripe_adapter;
mod stripe_types;

pub use mock_payment_processor::MockPaymentProcessor;
pub use stripe_adapter::{StripeConfig, StripeProcessorAdapter};
pub use stripe_types::{hex_encode, SignatureHeader, SignatureParseError};
