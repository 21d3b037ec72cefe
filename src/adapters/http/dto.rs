//! Data Transfer Objects for the HTTP API.
//!
//! Request and response bodies use camelCase. Domain records that already
//! serialize in camelCase (`Entitlement`, `Listing`, `User`, ...) are
//! embedded as-is.

use serde::{Deserialize, Serialize};

use crate::application::handlers::catalog::ListListingsQuery;
use crate::domain::catalog::{Listing, ListingKind};
use crate::domain::foundation::Role;
use crate::domain::membership::{ClubMembership, EnrollmentOutcome};
use crate::domain::payment::{Entitlement, ReconciliationOutcome};

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /create-checkout-session`.
///
/// Accepts the club-oriented names older clients send as aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    #[serde(alias = "clubId")]
    pub target_id: String,
    #[serde(alias = "clubName")]
    pub target_name: String,
    #[serde(default, alias = "bannerImage")]
    pub target_image: Option<String>,
    #[serde(default, alias = "description")]
    pub target_description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default = "default_purchase_type", alias = "type")]
    pub purchase_type: ListingKind,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_purchase_type() -> ListingKind {
    ListingKind::Club
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Body of `POST /payment-success`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccessRequest {
    #[serde(alias = "session_id")]
    pub session_id: String,
}

/// Reconciliation result. `payment` is absent when nothing was recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    /// `recorded`, `duplicate` or `not_complete`.
    pub outcome: &'static str,
    pub message: &'static str,
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Entitlement>,
}

impl From<ReconciliationOutcome> for ReconciliationResponse {
    fn from(outcome: ReconciliationOutcome) -> Self {
        Self {
            outcome: outcome.kind(),
            message: outcome.message(),
            transaction_id: outcome.transaction_id().map(|id| id.as_str().to_string()),
            payment: outcome.entitlement().cloned(),
        }
    }
}

/// Acknowledgement returned to the processor's webhook delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Memberships
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /memberships`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub club_id: String,
    #[serde(alias = "member")]
    pub member_email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub message: &'static str,
    pub already_joined: bool,
    pub membership: ClubMembership,
}

impl From<EnrollmentOutcome> for EnrollmentResponse {
    fn from(outcome: EnrollmentOutcome) -> Self {
        Self {
            message: outcome.message(),
            already_joined: outcome.is_already_joined(),
            membership: outcome.membership().clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Users and roles
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /users`; profile fields default to the token's claims.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// Body of `PATCH /users/role`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Listings
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /clubs` and `POST /events`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Major currency units; zero for free listings.
    #[serde(default)]
    pub price: f64,
}

/// Query string of `GET /clubs` and `GET /events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListListingsParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl From<ListListingsParams> for ListListingsQuery {
    fn from(params: ListListingsParams) -> Self {
        Self {
            category: params.category,
            search: params.search,
            limit: params.limit,
        }
    }
}

/// Body of `PATCH /listings/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingsResponse {
    pub items: Vec<Listing>,
}
