//! User module - accounts and role change requests.

mod account;
mod role_request;

pub use account::User;
pub use role_request::RoleChangeRequest;
