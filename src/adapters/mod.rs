//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token verification (JWKS, mock)
//! - `http` - axum routes, middleware and DTOs
//! - `memory` - In-memory stores for tests and local runs
//! - `postgres` - PostgreSQL stores
//! - `stripe` - Stripe hosted checkout (and a mock processor)

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
