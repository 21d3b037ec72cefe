//! Authentication adapters.
//!
//! Implementations of the `IdentityVerifier` port:
//!
//! - `jwks` - Production verifier for JWKS-signed ID tokens
//! - `mock` - Test implementation that doesn't require external services

mod jwks;
mod mock;

pub use jwks::{JwksConfig, JwksIdentityVerifier, FIREBASE_JWKS_URL};
pub use mock::MockIdentityVerifier;
