//! Axum router configuration.
//!
//! Routes are grouped by the gate in front of them. Each group carries its
//! own `require_role` route layer; groups are merged so one path can expose
//! methods behind different gates (e.g. `GET /users` for admins and
//! `POST /users` for any signed-in caller).

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::domain::foundation::Role;

use super::app_state::AppState;
use super::handlers;
use super::middleware::{auth_middleware, require_role};

/// Transport settings for the assembled router.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub request_timeout: Duration,
    /// Allowed origins; `*` (or an empty list) allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// API routes without transport layers.
///
/// # Routes
///
/// ## Public
/// - `GET /health`, `GET /clubs`, `GET /events`
/// - `GET /clubs/:id`, `GET /events/:id` (visibility depends on the caller)
/// - `POST /webhooks/stripe` (signature verified)
///
/// ## Signed-in callers
/// - `POST /create-checkout-session`, `POST /payment-success`, `GET /payments/mine`
/// - `POST /memberships`, `GET /memberships/mine`, `GET /memberships/:club_id`
/// - `POST /users`, `GET /users/role`, `POST /role-requests`
///
/// ## Managers
/// - `POST /clubs`, `POST /events`, `GET /manager/listings`, `DELETE /listings/:id`
///
/// ## Admins
/// - `GET /payments`, `GET /users`, `PATCH /users/role`, `GET /role-requests`
/// - `PATCH /listings/:id/status`
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/clubs", get(handlers::list_clubs))
        .route("/events", get(handlers::list_events))
        .route("/clubs/:id", get(handlers::get_club))
        .route("/events/:id", get(handlers::get_event))
        .route("/webhooks/stripe", post(handlers::stripe_webhook));

    let signed_in = Router::new()
        .route("/create-checkout-session", post(handlers::create_checkout_session))
        .route("/payment-success", post(handlers::payment_success))
        .route("/payments/mine", get(handlers::my_payments))
        .route("/memberships", post(handlers::enroll))
        .route("/memberships/mine", get(handlers::my_memberships))
        .route("/memberships/:club_id", get(handlers::get_membership))
        .route("/users", post(handlers::record_login))
        .route("/users/role", get(handlers::get_role))
        .route("/role-requests", post(handlers::request_manager_role));

    let managers = Router::new()
        .route("/clubs", post(handlers::create_club))
        .route("/events", post(handlers::create_event))
        .route("/manager/listings", get(handlers::manager_listings))
        .route("/listings/:id", delete(handlers::delete_listing))
        .route_layer(middleware::from_fn_with_state(
            state.required(Role::Manager),
            require_role,
        ));

    let admins = Router::new()
        .route("/payments", get(handlers::all_payments))
        .route("/users", get(handlers::list_users))
        .route("/users/role", patch(handlers::update_role))
        .route("/role-requests", get(handlers::list_role_requests))
        .route("/listings/:id/status", patch(handlers::update_listing_status))
        .route_layer(middleware::from_fn_with_state(
            state.required(Role::Admin),
            require_role,
        ));

    public.merge(signed_in).merge(managers).merge(admins)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Builds the complete router with the middleware stack.
///
/// Applied in order (outermost first): tracing, CORS, request timeout,
/// bearer token verification.
pub fn app(state: AppState, options: HttpOptions) -> Router {
    Router::new()
        .merge(api_routes(&state))
        .layer(middleware::from_fn_with_state(
            state.identity.clone(),
            auth_middleware,
        ))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
