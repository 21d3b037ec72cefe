//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the ClubSphere domain.

mod auth;
mod email;
mod errors;
mod ids;
mod money;
mod role;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use email::Email;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EntitlementId, ListingId, MembershipId, TransactionId, UserId};
pub use money::Money;
pub use role::Role;
pub use timestamp::Timestamp;
