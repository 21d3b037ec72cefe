//! User handlers.
//!
//! ## Commands
//! - Recording a login (registers on first sight)
//! - Requesting the manager role
//! - Updating a user's role (admin)
//!
//! ## Queries
//! - Resolve the caller's role
//! - List role requests and users (admin)

mod record_login;
mod roles;

// Commands
pub use record_login::{RecordLoginCommand, RecordLoginHandler};
pub use roles::{RequestManagerRoleHandler, UpdateRoleCommand, UpdateRoleHandler, MSG_ALREADY_REQUESTED};

// Queries
pub use roles::{GetRoleHandler, ListRoleRequestsHandler, ListUsersHandler};
