//! In-memory adapters for every store port.
//!
//! Each store lives behind a `tokio::sync::RwLock`, and the uniqueness check
//! and insert happen under one write guard, so these stores enforce the same
//! uniqueness rules as the PostgreSQL tables. Useful for tests and for running
//! locally without a database.

mod entitlements;
mod listings;
mod memberships;
mod role_requests;
mod users;

pub use entitlements::InMemoryEntitlementRepository;
pub use listings::InMemoryListingRepository;
pub use memberships::InMemoryMembershipRepository;
pub use role_requests::InMemoryRoleRequestRepository;
pub use users::InMemoryUserRepository;
