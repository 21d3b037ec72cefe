//! Application error taxonomy.
//!
//! Every handler returns `ClubSphereError`. The HTTP adapter maps it to a
//! status code; nothing below the application layer knows about HTTP.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthenticated | 401 |
//! | Forbidden | 403 |
//! | NotPermitted | 403 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Validation | 400 |
//! | UpstreamPayment | 502 |
//! | Store | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, Role, TransactionId, ValidationError};
use crate::ports::PaymentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubSphereError {
    /// Missing, malformed or rejected credential.
    Unauthenticated,

    /// Caller's role does not match the role the operation requires.
    Forbidden { required: Role, actual: Role },

    /// Caller acts on a record they do not own.
    NotPermitted(String),

    /// Referenced record does not exist (or is not visible to the caller).
    NotFound(String),

    /// Duplicate of a record that must be unique.
    Conflict(String),

    /// Malformed input.
    Validation { field: String, message: String },

    /// Payment processor failed, or reported something we refuse to record.
    UpstreamPayment {
        message: String,
        transaction_id: Option<TransactionId>,
    },

    /// Underlying persistence failure.
    Store(String),
}

impl ClubSphereError {
    pub fn unauthenticated() -> Self {
        ClubSphereError::Unauthenticated
    }

    pub fn forbidden(required: Role, actual: Role) -> Self {
        ClubSphereError::Forbidden { required, actual }
    }

    pub fn not_permitted(message: impl Into<String>) -> Self {
        ClubSphereError::NotPermitted(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ClubSphereError::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ClubSphereError::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClubSphereError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ClubSphereError::UpstreamPayment {
            message: message.into(),
            transaction_id: None,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        ClubSphereError::Store(message.into())
    }

    /// Attaches the transaction id to an upstream error; other variants are unchanged.
    pub fn with_transaction_id(self, id: TransactionId) -> Self {
        match self {
            ClubSphereError::UpstreamPayment { message, .. } => ClubSphereError::UpstreamPayment {
                message,
                transaction_id: Some(id),
            },
            other => other,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ClubSphereError::Unauthenticated => ErrorCode::Unauthorized,
            ClubSphereError::Forbidden { .. } | ClubSphereError::NotPermitted(_) => {
                ErrorCode::Forbidden
            }
            ClubSphereError::NotFound(_) => ErrorCode::NotFound,
            ClubSphereError::Conflict(_) => ErrorCode::Conflict,
            ClubSphereError::Validation { .. } => ErrorCode::ValidationFailed,
            ClubSphereError::UpstreamPayment { .. } => ErrorCode::UpstreamPaymentError,
            ClubSphereError::Store(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            ClubSphereError::Unauthenticated => "Unauthorized access".to_string(),
            ClubSphereError::Forbidden { required, .. } => {
                format!("Forbidden: requires {} role", required)
            }
            ClubSphereError::NotPermitted(message) => format!("Forbidden: {}", message),
            ClubSphereError::NotFound(what) => format!("{} not found", what),
            ClubSphereError::Conflict(message) => message.clone(),
            ClubSphereError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ClubSphereError::UpstreamPayment { message, .. } => {
                format!("Payment processor error: {}", message)
            }
            ClubSphereError::Store(_) => "Internal store error".to_string(),
        }
    }
}

impl std::fmt::Display for ClubSphereError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Keep the store detail in logs, not in the user-facing message.
            ClubSphereError::Store(detail) => write!(f, "Store error: {}", detail),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ClubSphereError {}

impl From<DomainError> for ClubSphereError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound => ClubSphereError::NotFound(err.message),
            ErrorCode::Conflict => ClubSphereError::Conflict(err.message),
            ErrorCode::ValidationFailed => ClubSphereError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Unauthorized => ClubSphereError::Unauthenticated,
            ErrorCode::UpstreamPaymentError => ClubSphereError::upstream(err.message),
            _ => ClubSphereError::Store(err.to_string()),
        }
    }
}

impl From<PaymentError> for ClubSphereError {
    fn from(err: PaymentError) -> Self {
        ClubSphereError::upstream(err.message)
    }
}

impl From<ValidationError> for ClubSphereError {
    fn from(err: ValidationError) -> Self {
        ClubSphereError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
