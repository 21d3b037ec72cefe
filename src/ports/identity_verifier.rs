//! Identity verification port for bearer tokens.
//!
//! This port defines the contract for verifying an inbound credential and
//! resolving it to a caller identity. It is provider-agnostic: the JWKS
//! adapter handles Firebase-style ID tokens, and a mock exists for tests.
//!
//! # Security Requirements
//!
//! All implementations MUST validate:
//! - **Signature**: Token must be signed by a key the issuer publishes
//! - **Issuer (iss)**: Token must come from the expected identity platform
//! - **Audience (aud)**: Token must be intended for this application
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Verifies bearer tokens and extracts the caller identity.
///
/// HTTP middleware calls this once per request. Verification has no side
/// effects; in particular it never touches the user store.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signature/issuer/audience
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` when signing keys cannot be fetched
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw token (without the "Bearer " prefix).
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Email, UserId};
    use std::sync::Arc;

    struct FixedVerifier;

    #[async_trait]
    impl IdentityVerifier for FixedVerifier {
        async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            match token {
                "good" => Ok(AuthenticatedUser::new(
                    UserId::new("uid-1").unwrap(),
                    Email::new("a@x.com").unwrap(),
                    None,
                    true,
                )),
                "old" => Err(AuthError::TokenExpired),
                _ => Err(AuthError::InvalidToken),
            }
        }
    }

    #[tokio::test]
    async fn verifier_is_object_safe() {
        let verifier: Arc<dyn IdentityVerifier> = Arc::new(FixedVerifier);

        assert_eq!(
            verifier.verify("good").await.unwrap().email.as_str(),
            "a@x.com"
        );
        assert_eq!(verifier.verify("old").await, Err(AuthError::TokenExpired));
        assert_eq!(verifier.verify("bad").await, Err(AuthError::InvalidToken));
    }
}
