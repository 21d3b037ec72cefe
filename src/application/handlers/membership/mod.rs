//! Membership handlers.
//!
//! ## Commands
//! - Enrolling in a club (idempotent per club and member)
//!
//! ## Queries
//! - Get the caller's membership for a club
//! - List the caller's memberships

mod enroll_member;
mod get_membership;

pub use enroll_member::{EnrollMemberCommand, EnrollMemberHandler};
pub use get_membership::{GetMembershipHandler, GetMembershipQuery, ListMembershipsHandler};
