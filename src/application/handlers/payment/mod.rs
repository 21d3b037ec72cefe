//! Payment handlers.
//!
//! ## Commands
//! - Creating a hosted checkout session
//! - Reconciling a session into a paid entitlement
//!
//! ## Queries
//! - Listing recorded payments (own or all)

mod create_checkout_session;
mod list_payments;
mod reconcile_payment;

// Commands
pub use create_checkout_session::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult, SESSION_ID_PLACEHOLDER,
};
pub use reconcile_payment::{ReconcilePaymentCommand, ReconcilePaymentHandler};

// Queries
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
