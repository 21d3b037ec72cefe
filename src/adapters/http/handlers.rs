//! HTTP handlers.
//!
//! These handlers connect axum routes to application command/query handlers.
//! Role checks run in the `require_role` route layer before any handler here;
//! ownership and self-only checks live in the application handlers.

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::catalog::{
    CreateListingCommand, DeleteListingCommand, UpdateListingStatusCommand,
};
use crate::application::handlers::membership::{EnrollMemberCommand, GetMembershipQuery};
use crate::application::handlers::payment::{
    CreateCheckoutSessionCommand, ListPaymentsQuery, ReconcilePaymentCommand,
};
use crate::application::handlers::user::{RecordLoginCommand, UpdateRoleCommand};
use crate::application::ClubSphereError;
use crate::domain::catalog::ListingKind;
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::ProcessorEventKind;

use super::app_state::AppState;
use super::dto::{
    CheckoutResponse, CreateCheckoutRequest, CreateListingRequest, EnrollRequest,
    EnrollmentResponse, ListListingsParams, LoginRequest, PaymentSuccessRequest,
    ReconciliationResponse, RoleResponse, UpdateRoleRequest, UpdateStatusRequest, WebhookAck,
};
use super::error::ApiError;
use super::middleware::{OptionalAuth, RequireAuth};

/// Header carrying the processor's webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateCheckoutSessionCommand {
        caller: user,
        target_id: request.target_id,
        target_name: request.target_name,
        target_image: request.target_image,
        target_description: request.target_description,
        price: request.price,
        customer_email: request.customer_email,
        purchase_type: request.purchase_type,
        declared_status: request.status,
        declared_category: request.category,
    };

    let result = state.create_checkout_handler().handle(cmd).await?;
    Ok(Json(CheckoutResponse {
        url: result.session.url,
    }))
}

/// POST /payment-success
pub async fn payment_success(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<PaymentSuccessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .reconcile_handler()
        .handle(ReconcilePaymentCommand::new(request.session_id))
        .await?;

    Ok(Json(ReconciliationResponse::from(outcome)))
}

/// POST /webhooks/stripe
///
/// Verified by signature rather than bearer token. Completed checkouts run
/// through the same reconciler as the client callback.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ClubSphereError::validation(STRIPE_SIGNATURE_HEADER, "Missing Stripe-Signature header")
        })?;

    let event = state
        .processor
        .verify_webhook(&body, signature)
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected webhook");
            ClubSphereError::validation(STRIPE_SIGNATURE_HEADER, e.message)
        })?;

    match event.kind {
        ProcessorEventKind::CheckoutCompleted { session_id } => {
            let outcome = state
                .reconcile_handler()
                .handle(ReconcilePaymentCommand::new(session_id))
                .await?;
            tracing::info!(event_id = %event.id, outcome = outcome.kind(), "Webhook reconciled");
            Ok(Json(WebhookAck {
                received: true,
                outcome: Some(outcome.kind()),
            }))
        }
        ProcessorEventKind::Other(kind) => {
            tracing::debug!(event_id = %event.id, kind = %kind, "Ignoring webhook event");
            Ok(Json(WebhookAck {
                received: true,
                outcome: None,
            }))
        }
    }
}

/// GET /payments/mine
pub async fn my_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery::Customer(user.email))
        .await?;
    Ok(Json(payments))
}

/// GET /payments (admin)
pub async fn all_payments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let payments = state.list_payments_handler().handle(ListPaymentsQuery::All).await?;
    Ok(Json(payments))
}

// ════════════════════════════════════════════════════════════════════════════════
// Memberships
// ════════════════════════════════════════════════════════════════════════════════

/// POST /memberships
///
/// 201 when a membership is created, 200 with `alreadyJoined` otherwise.
pub async fn enroll(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<EnrollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .enroll_handler()
        .handle(EnrollMemberCommand {
            caller: user,
            club_id: request.club_id,
            member_email: request.member_email,
        })
        .await?;

    let status = if outcome.is_already_joined() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(EnrollmentResponse::from(outcome))))
}

/// GET /memberships/mine
pub async fn my_memberships(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let memberships = state.list_memberships_handler().handle(user.email).await?;
    Ok(Json(memberships))
}

/// GET /memberships/:club_id
pub async fn get_membership(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(club_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = state
        .get_membership_handler()
        .handle(GetMembershipQuery {
            club_id,
            member_email: user.email,
        })
        .await?;
    Ok(Json(membership))
}

// ════════════════════════════════════════════════════════════════════════════════
// Users and roles
// ════════════════════════════════════════════════════════════════════════════════

/// POST /users
pub async fn record_login(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let stored = state
        .record_login_handler()
        .handle(RecordLoginCommand {
            caller: user,
            name: request.name,
            image: request.image,
        })
        .await?;
    Ok(Json(stored))
}

/// GET /users/role
pub async fn get_role(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let role = state.get_role_handler().handle(&user.email).await?;
    Ok(Json(RoleResponse { role }))
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.list_users_handler().handle(&user.email).await?;
    Ok(Json(users))
}

/// PATCH /users/role (admin)
pub async fn update_role(
    State(state): State<AppState>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .update_role_handler()
        .handle(UpdateRoleCommand {
            email: request.email,
            role: request.role,
        })
        .await?;
    Ok(Json(user))
}

/// POST /role-requests
pub async fn request_manager_role(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let request = state.request_manager_handler().handle(user.email).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /role-requests (admin)
pub async fn list_role_requests(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state.list_role_requests_handler().handle().await?;
    Ok(Json(requests))
}

// ════════════════════════════════════════════════════════════════════════════════
// Listings
// ════════════════════════════════════════════════════════════════════════════════

async fn create_listing(
    state: AppState,
    kind: ListingKind,
    user: AuthenticatedUser,
    request: CreateListingRequest,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .create_listing_handler()
        .handle(CreateListingCommand {
            caller: user,
            kind,
            name: request.name,
            description: request.description,
            image: request.image,
            category: request.category,
            location: request.location,
            price: request.price,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// POST /clubs (manager)
pub async fn create_club(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_listing(state, ListingKind::Club, user, request).await
}

/// POST /events (manager)
pub async fn create_event(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_listing(state, ListingKind::Event, user, request).await
}

/// GET /clubs
pub async fn list_clubs(
    State(state): State<AppState>,
    Query(params): Query<ListListingsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state
        .list_listings_handler()
        .handle(ListingKind::Club, params.into())
        .await?;
    Ok(Json(listings))
}

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListListingsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state
        .list_listings_handler()
        .handle(ListingKind::Event, params.into())
        .await?;
    Ok(Json(listings))
}

/// GET /clubs/:id
pub async fn get_club(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .get_listing_handler()
        .handle(ListingKind::Club, id, viewer.as_ref())
        .await?;
    Ok(Json(listing))
}

/// GET /events/:id
pub async fn get_event(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .get_listing_handler()
        .handle(ListingKind::Event, id, viewer.as_ref())
        .await?;
    Ok(Json(listing))
}

/// GET /manager/listings (manager)
pub async fn manager_listings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.manager_listings_handler().handle(&user.email).await?;
    Ok(Json(listings))
}

/// PATCH /listings/:id/status (admin)
pub async fn update_listing_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .update_status_handler()
        .handle(UpdateListingStatusCommand {
            id,
            status: request.status,
        })
        .await?;
    Ok(Json(listing))
}

/// DELETE /listings/:id (manager, owner only)
pub async fn delete_listing(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_listing_handler()
        .handle(DeleteListingCommand { caller: user, id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
