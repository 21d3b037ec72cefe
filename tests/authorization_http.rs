//! Integration tests for the HTTP surface.
//!
//! These drive the assembled axum router with `oneshot`, backed by in-memory
//! stores, the mock identity verifier and the mock processor:
//! 1. Authentication failures are 401 and happen before any store access
//! 2. Role-gated routes answer 403 with the caller's role and change nothing
//! 3. Checkout, reconciliation, enrollment and the webhook work end to end

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use club_sphere::adapters::auth::MockIdentityVerifier;
use club_sphere::adapters::http::{app, AppState, HttpOptions};
use club_sphere::adapters::memory::{
    InMemoryEntitlementRepository, InMemoryListingRepository, InMemoryMembershipRepository,
    InMemoryRoleRequestRepository, InMemoryUserRepository,
};
use club_sphere::adapters::stripe::MockPaymentProcessor;
use club_sphere::application::handlers::payment::CheckoutSettings;
use club_sphere::domain::catalog::{Listing, ListingKind, ListingStatus, NewListing};
use club_sphere::domain::foundation::{Email, ListingId, Money, Role};
use club_sphere::domain::payment::CheckoutStatus;
use club_sphere::ports::{
    EntitlementRepository, ListingRepository, ProcessorSession, UserRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CUSTOMER_TOKEN: &str = "customer-token";
const MANAGER_TOKEN: &str = "manager-token";
const ADMIN_TOKEN: &str = "admin-token";
const NEWCOMER_TOKEN: &str = "newcomer-token";

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserRepository>,
    entitlements: Arc<InMemoryEntitlementRepository>,
    processor: MockPaymentProcessor,
}

impl TestApp {
    async fn new() -> Self {
        let identity = MockIdentityVerifier::new()
            .with_test_user(CUSTOMER_TOKEN, "a@x.com")
            .and_then(|v| v.with_test_user(MANAGER_TOKEN, "manager@x.com"))
            .and_then(|v| v.with_test_user(ADMIN_TOKEN, "admin@x.com"))
            .and_then(|v| v.with_test_user(NEWCOMER_TOKEN, "new@x.com"))
            .unwrap();

        let users = Arc::new(InMemoryUserRepository::new());
        users.seed(email("a@x.com"), Role::Customer).await;
        users.seed(email("manager@x.com"), Role::Manager).await;
        users.seed(email("admin@x.com"), Role::Admin).await;

        let listings = Arc::new(InMemoryListingRepository::new());
        listings.insert(&club("club123", ListingStatus::Approved)).await.unwrap();
        listings.insert(&club("hidden1", ListingStatus::Pending)).await.unwrap();
        listings.insert(&free_club("rowing1")).await.unwrap();

        let entitlements = Arc::new(InMemoryEntitlementRepository::new());
        let processor = MockPaymentProcessor::new();

        let state = AppState {
            identity: Arc::new(identity),
            users: users.clone(),
            role_requests: Arc::new(InMemoryRoleRequestRepository::new()),
            listings,
            entitlements: entitlements.clone(),
            memberships: Arc::new(InMemoryMembershipRepository::new()),
            processor: Arc::new(processor.clone()),
            checkout: CheckoutSettings::new("https://clubsphere.test", "usd"),
        };

        Self {
            router: app(state, HttpOptions::default()),
            users,
            entitlements,
            processor,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send_raw(&self.router, request).await
    }

    async fn stored_role(&self, address: &str) -> Role {
        self.users
            .find_by_email(&email(address))
            .await
            .unwrap()
            .map(|u| u.role)
            .unwrap_or_default()
    }
}

async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn email(raw: &str) -> Email {
    Email::new(raw).unwrap()
}

fn club(id: &str, status: ListingStatus) -> Listing {
    let mut listing = Listing::create(
        ListingKind::Club,
        email("manager@x.com"),
        NewListing {
            name: "Chess Club".to_string(),
            description: None,
            image: None,
            category: Some("games".to_string()),
            location: None,
            price: Money::from_minor(2000),
        },
    )
    .unwrap();
    listing.id = ListingId::parse(id).unwrap();
    listing.status = status;
    listing
}

fn free_club(id: &str) -> Listing {
    let mut listing = club(id, ListingStatus::Approved);
    listing.name = "Rowing Club".to_string();
    listing.price = Money::from_minor(0);
    listing
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/users/role", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errorCode"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn invalid_token_is_401() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::GET, "/users/role", Some("forged"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_route_without_token_is_401_not_403() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::PATCH,
            "/users/role",
            None,
            Some(json!({ "email": "a@x.com", "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.stored_role("a@x.com").await, Role::Customer);
}

// =============================================================================
// Authorization Gate
// =============================================================================

#[tokio::test]
async fn customer_cannot_promote_anyone() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::PATCH,
            "/users/role",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "email": "a@x.com", "role": "admin" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["role"], "customer");
    assert_eq!(app.stored_role("a@x.com").await, Role::Customer);
}

#[tokio::test]
async fn manager_is_not_admin() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(Method::GET, "/users", Some(MANAGER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["role"], "manager");
}

#[tokio::test]
async fn admin_updates_role_and_user_list_excludes_self() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::PATCH,
            "/users/role",
            Some(ADMIN_TOKEN),
            Some(json!({ "email": "a@x.com", "role": "manager" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "manager");
    assert_eq!(app.stored_role("a@x.com").await, Role::Manager);

    let (status, body) = app.send(Method::GET, "/users", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["email"].as_str())
        .collect();
    assert!(!emails.contains(&"admin@x.com"));
    assert!(emails.contains(&"a@x.com"));
}

#[tokio::test]
async fn updating_unknown_user_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::PATCH,
            "/users/role",
            Some(ADMIN_TOKEN),
            Some(json!({ "email": "ghost@x.com", "role": "manager" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_lookup_defaults_to_customer_for_unknown_user() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(Method::GET, "/users/role", Some(NEWCOMER_TOKEN), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "customer");
}

#[tokio::test]
async fn duplicate_role_request_is_conflict() {
    let app = TestApp::new().await;
    let (first, _) = app
        .send(Method::POST, "/role-requests", Some(CUSTOMER_TOKEN), None)
        .await;
    let (second, body) = app
        .send(Method::POST, "/role-requests", Some(CUSTOMER_TOKEN), None)
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["errorCode"], "CONFLICT");

    let (status, body) = app
        .send(Method::GET, "/role-requests", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn customer_cannot_create_club() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/clubs",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "name": "Go Club" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn manager_creates_pending_club_hidden_from_public() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/clubs",
            Some(MANAGER_TOKEN),
            Some(json!({ "name": "Go Club", "price": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = app.send(Method::GET, &format!("/clubs/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, &format!("/clubs/{}", id), Some(MANAGER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn public_list_shows_only_approved_clubs() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/clubs?search=chess", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["club123"]);
}

#[tokio::test]
async fn admin_approves_listing() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::PATCH,
            "/listings/hidden1/status",
            Some(ADMIN_TOKEN),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, _) = app.send(Method::GET, "/clubs/hidden1", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Payments and memberships
// =============================================================================

#[tokio::test]
async fn checkout_then_payment_success_records_once() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/create-checkout-session",
            Some(CUSTOMER_TOKEN),
            Some(json!({
                "clubId": "club123",
                "clubName": "Chess Club",
                "price": 20,
                "customerEmail": "a@x.com",
                "type": "club"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://checkout.stripe.test/cs_test_1");

    // The customer pays; the processor now reports the session complete.
    let request = app.processor.created_requests().remove(0);
    app.processor.add_session(ProcessorSession {
        id: "cs_test_1".to_string(),
        payment_intent_id: Some("pi_1".to_string()),
        status: CheckoutStatus::Complete,
        amount_total_minor: Some(request.unit_amount_minor),
        metadata: request.metadata,
    });

    let (status, first) = app
        .send(
            Method::POST,
            "/payment-success",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "sessionId": "cs_test_1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Payment recorded.");
    assert_eq!(first["transactionId"], "pi_1");

    let (_, second) = app
        .send(
            Method::POST,
            "/payment-success",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "sessionId": "cs_test_1" })),
        )
        .await;
    assert_eq!(second["message"], "Payment already recorded.");
    assert_eq!(second["transactionId"], "pi_1");
    assert_eq!(app.entitlements.list_all().await.unwrap().len(), 1);

    let (status, mine) = app
        .send(Method::GET, "/payments/mine", Some(CUSTOMER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn checkout_for_another_email_is_forbidden() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/create-checkout-session",
            Some(CUSTOMER_TOKEN),
            Some(json!({
                "clubId": "club123",
                "clubName": "Chess Club",
                "price": 20,
                "customerEmail": "b@x.com"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.processor.created_requests().is_empty());
}

#[tokio::test]
async fn all_payments_requires_admin() {
    let app = TestApp::new().await;
    let (customer, _) = app
        .send(Method::GET, "/payments", Some(CUSTOMER_TOKEN), None)
        .await;
    let (admin, body) = app.send(Method::GET, "/payments", Some(ADMIN_TOKEN), None).await;

    assert_eq!(customer, StatusCode::FORBIDDEN);
    assert_eq!(admin, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn enrolling_twice_reports_already_joined() {
    let app = TestApp::new().await;
    let body = json!({ "clubId": "rowing1", "memberEmail": "a@x.com" });

    let (first, _) = app
        .send(Method::POST, "/memberships", Some(CUSTOMER_TOKEN), Some(body.clone()))
        .await;
    let (second, response) = app
        .send(Method::POST, "/memberships", Some(CUSTOMER_TOKEN), Some(body))
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(response["message"], "You have already joined this club.");
    assert_eq!(response["alreadyJoined"], true);

    let (status, membership) = app
        .send(Method::GET, "/memberships/rowing1", Some(CUSTOMER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(membership["memberEmail"], "a@x.com");

    let (_, mine) = app
        .send(Method::GET, "/memberships/mine", Some(CUSTOMER_TOKEN), None)
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn joining_paid_club_before_paying_is_403() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/memberships",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "clubId": "club123", "memberEmail": "a@x.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["errorCode"], "FORBIDDEN");
}

#[tokio::test]
async fn joining_hidden_club_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/memberships",
            Some(CUSTOMER_TOKEN),
            Some(json!({ "clubId": "hidden1", "memberEmail": "a@x.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn membership_lookup_for_unjoined_club_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::GET, "/memberships/club123", Some(CUSTOMER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Webhook
// =============================================================================

#[tokio::test]
async fn webhook_with_bad_signature_is_400() {
    let app = TestApp::new().await;
    let request = Request::post("/webhooks/stripe")
        .header("Stripe-Signature", "invalid")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send_raw(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn webhook_without_signature_is_400() {
    let app = TestApp::new().await;
    let request = Request::post("/webhooks/stripe")
        .body(Body::from("{}"))
        .unwrap();

    let (status, _) = send_raw(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completed_checkout_webhook_records_payment() {
    let app = TestApp::new().await;
    app.processor.add_session(ProcessorSession {
        id: "cs_hook".to_string(),
        payment_intent_id: Some("pi_hook".to_string()),
        status: CheckoutStatus::Complete,
        amount_total_minor: Some(2000),
        metadata: [
            ("targetId", "club123"),
            ("targetName", "Chess Club"),
            ("customer", "a@x.com"),
            ("type", "club"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    });

    let event = json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_hook" } }
    });
    let request = Request::post("/webhooks/stripe")
        .header("Stripe-Signature", "t=1,v1=ok")
        .body(Body::from(event.to_string()))
        .unwrap();

    let (status, body) = send_raw(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "recorded");

    let stored = app.entitlements.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].transaction_id.as_str(), "pi_hook");
}
