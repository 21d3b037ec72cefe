//! Application handlers.
//!
//! Command and query handlers grouped by area:
//!
//! - `payment` - checkout, reconciliation and payment listings
//! - `membership` - club enrollment and lookups
//! - `user` - login, roles and role change requests
//! - `catalog` - club and event listings

pub mod catalog;
pub mod membership;
pub mod payment;
pub mod user;
