//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers are built per request from `Arc<dyn Port>` dependencies and
//! return `ClubSphereError`.

pub mod authorization;
pub mod error;
pub mod handlers;

pub use authorization::AuthorizationGate;
pub use error::ClubSphereError;
