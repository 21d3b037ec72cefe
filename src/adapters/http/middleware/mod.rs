//! HTTP middleware for axum.
//!
//! - `auth` - Token verification middleware, auth extractors and the role layer

pub mod auth;

pub use auth::{
    auth_middleware, require_role, AuthState, OptionalAuth, RequireAuth, RequiredRole,
};
