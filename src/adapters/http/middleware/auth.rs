//! Authentication middleware, extractors and the role layer for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies Bearer tokens and injects the caller into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//! - `require_role` - Route layer that admits only callers holding a stored role
//!
//! # Architecture
//!
//! The middleware uses the `IdentityVerifier` port, keeping it provider-agnostic.
//! Role checks go through the `AuthorizationGate`, which reads the user store.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              require_role (route layer) → AuthorizationGate
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! let verifier: Arc<dyn IdentityVerifier> = Arc::new(MockIdentityVerifier::new());
//! let admin_only = RequiredRole::new(gate, Role::Admin);
//!
//! let app = Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(middleware::from_fn_with_state(admin_only, require_role))
//!     .layer(middleware::from_fn_with_state(verifier, auth_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::application::{AuthorizationGate, ClubSphereError};
use crate::domain::foundation::{AuthError, AuthenticatedUser, Role};
use crate::ports::IdentityVerifier;

/// Auth middleware state - wraps the identity verifier.
pub type AuthState = Arc<dyn IdentityVerifier>;

/// Pulls the raw token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token is malformed.
pub(crate) fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or(AuthError::MissingCredential)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

/// Authentication middleware that verifies Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Verifies the token using the `IdentityVerifier` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing header, continues without injecting (for public routes)
/// 5. On a malformed header or rejected token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return next.run(request).await;
    };

    let token = match value.to_str().map_err(|_| AuthError::MissingCredential) {
        Ok(value) => bearer_token(value),
        Err(e) => Err(e),
    };

    let verified = match token {
        Ok(token) => verifier.verify(token).await,
        Err(e) => Err(e),
    };

    match verified {
        Ok(user) => {
            tracing::debug!(email = %user.email, "Caller verified");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(
                    "AUTH_UNAVAILABLE",
                    "Authentication service unavailable",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected credential");
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor that requires authentication.
///
/// If no user is in the request extensions (i.e., auth middleware didn't
/// verify a token), rejects with 401 Unauthorized.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(ApiError(ClubSphereError::Unauthenticated))
        })
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` if no valid token was provided, `Some(user)` if authenticated.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts.extensions.get::<AuthenticatedUser>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// State for the `require_role` layer: the gate plus the role it demands.
#[derive(Clone)]
pub struct RequiredRole {
    gate: AuthorizationGate,
    role: Role,
}

impl RequiredRole {
    pub fn new(gate: AuthorizationGate, role: Role) -> Self {
        Self { gate, role }
    }
}

/// Route layer admitting only callers whose stored role equals the required one.
///
/// Runs before the handler, so a denied request never reaches a store write.
pub async fn require_role(
    State(required): State<RequiredRole>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(ApiError(ClubSphereError::Unauthenticated))?;

    required.gate.require_role(&user, required.role).await?;
    Ok(next.run(request).await)
}
