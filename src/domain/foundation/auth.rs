//! Authentication types for the domain layer.
//!
//! These types represent a caller identity extracted from a verified bearer
//! token. They have **no external dependencies** - any identity platform can
//! populate them via the `IdentityVerifier` port.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token verification:
//! let user = AuthenticatedUser::new(
//!     UserId::new("firebase-uid")?,
//!     Email::new("user@example.com")?,
//!     Some("Alice".to_string()),
//!     true,
//! );
//!
//! request.extensions_mut().insert(user);
//! ```

use super::{Email, UserId};
use thiserror::Error;

/// Caller identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject identifier from the identity platform.
    pub id: UserId,

    /// Verified email; the identity key used by every store.
    pub email: Email,

    /// Display name if available.
    pub display_name: Option<String>,

    /// Whether the identity platform has verified the email.
    pub email_verified: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: Email,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            email_verified,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.email.as_str())
    }
}

/// Authentication errors that can occur during token verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was supplied, or the Authorization header is not `Bearer <token>`.
    #[error("Missing or malformed credential")]
    MissingCredential,

    /// The token is malformed or has an invalid signature, issuer or audience.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The identity platform could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
