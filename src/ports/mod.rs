//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity
//!
//! - `IdentityVerifier` - Bearer token verification
//!
//! ## Stores
//!
//! - `UserRepository` - Users and their roles, keyed by email
//! - `RoleRequestRepository` - Pending manager role requests
//! - `ListingRepository` - Clubs and events
//! - `EntitlementRepository` - Paid records, unique per transaction id
//! - `MembershipRepository` - Club memberships, unique per (club, member)
//!
//! ## Payments
//!
//! - `PaymentProcessor` - Hosted checkout, session retrieval and webhooks

mod entitlement_repository;
mod identity_verifier;
mod listing_repository;
mod membership_repository;
mod payment_processor;
mod role_request_repository;
mod save_result;
mod user_repository;

pub use entitlement_repository::EntitlementRepository;
pub use identity_verifier::IdentityVerifier;
pub use listing_repository::{ListingQuery, ListingRepository};
pub use membership_repository::MembershipRepository;
pub use payment_processor::{
    CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentErrorCode, PaymentProcessor,
    ProcessorEvent, ProcessorEventKind, ProcessorSession,
};
pub use role_request_repository::RoleRequestRepository;
pub use save_result::SaveResult;
pub use user_repository::UserRepository;
