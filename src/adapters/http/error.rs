//! HTTP error mapping.
//!
//! `ApiError` wraps the application taxonomy and renders it as a status code
//! plus a JSON `ErrorResponse`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ClubSphereError;
use crate::domain::foundation::{AuthError, DomainError};

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// The caller's stored role, on role mismatches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Processor transaction the failure relates to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            role: None,
            transaction_id: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub ClubSphereError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClubSphereError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ClubSphereError::Forbidden { .. } | ClubSphereError::NotPermitted(_) => {
                StatusCode::FORBIDDEN
            }
            ClubSphereError::NotFound(_) => StatusCode::NOT_FOUND,
            ClubSphereError::Conflict(_) => StatusCode::CONFLICT,
            ClubSphereError::Validation { .. } => StatusCode::BAD_REQUEST,
            ClubSphereError::UpstreamPayment { .. } => StatusCode::BAD_GATEWAY,
            ClubSphereError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match &self.0 {
            ClubSphereError::Unauthenticated => "UNAUTHENTICATED",
            ClubSphereError::Forbidden { .. } | ClubSphereError::NotPermitted(_) => "FORBIDDEN",
            ClubSphereError::NotFound(_) => "NOT_FOUND",
            ClubSphereError::Conflict(_) => "CONFLICT",
            ClubSphereError::Validation { .. } => "VALIDATION_FAILED",
            ClubSphereError::UpstreamPayment { .. } => "UPSTREAM_PAYMENT_ERROR",
            ClubSphereError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn body(&self) -> ErrorResponse {
        let mut body = ErrorResponse::new(self.error_code(), self.0.message());
        match &self.0 {
            ClubSphereError::Forbidden { required, actual } => {
                body.role = Some(actual.as_str().to_string());
                body.details = Some(serde_json::json!({ "requiredRole": required.as_str() }));
            }
            ClubSphereError::UpstreamPayment { transaction_id, .. } => {
                body.transaction_id = transaction_id.as_ref().map(|id| id.as_str().to_string());
            }
            ClubSphereError::Validation { field, .. } => {
                body.details = Some(serde_json::json!({ "field": field }));
            }
            _ => {}
        }
        body
    }
}

impl From<ClubSphereError> for ApiError {
    fn from(err: ClubSphereError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        Self(ClubSphereError::Unauthenticated)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
