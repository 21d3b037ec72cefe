//! Integration tests for payment reconciliation and membership enrollment.
//!
//! These drive the application handlers against the in-memory stores and the
//! mock processor, with concurrent callers on a multi-threaded runtime:
//! 1. A payment is recorded at most once per transaction id
//! 2. Repeated callbacks answer "Payment already recorded."
//! 3. Incomplete sessions record nothing
//! 4. A member joins a club at most once

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use club_sphere::adapters::memory::{
    InMemoryEntitlementRepository, InMemoryListingRepository, InMemoryMembershipRepository,
    InMemoryUserRepository,
};
use club_sphere::adapters::stripe::MockPaymentProcessor;
use club_sphere::application::handlers::membership::{EnrollMemberCommand, EnrollMemberHandler};
use club_sphere::application::handlers::payment::{
    ReconcilePaymentCommand, ReconcilePaymentHandler,
};
use club_sphere::application::{AuthorizationGate, ClubSphereError};
use club_sphere::domain::catalog::{Listing, ListingKind, ListingStatus, NewListing};
use club_sphere::domain::foundation::{AuthenticatedUser, Email, ListingId, Money, UserId};
use club_sphere::domain::membership::MSG_ALREADY_JOINED;
use club_sphere::domain::payment::{
    CheckoutMetadata, CheckoutStatus, ReconciliationOutcome, MSG_DUPLICATE, MSG_NOT_COMPLETE,
    MSG_RECORDED,
};
use club_sphere::ports::{
    EntitlementRepository, ListingRepository, MembershipRepository, ProcessorSession,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CUSTOMER: &str = "a@x.com";

struct Fixture {
    processor: MockPaymentProcessor,
    entitlements: Arc<InMemoryEntitlementRepository>,
    listings: Arc<InMemoryListingRepository>,
    memberships: Arc<InMemoryMembershipRepository>,
    users: Arc<InMemoryUserRepository>,
}

impl Fixture {
    async fn new() -> Self {
        let listings = Arc::new(InMemoryListingRepository::new());
        listings.insert(&chess_club()).await.unwrap();

        Self {
            processor: MockPaymentProcessor::new(),
            entitlements: Arc::new(InMemoryEntitlementRepository::new()),
            listings,
            memberships: Arc::new(InMemoryMembershipRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }

    fn reconciler(&self) -> ReconcilePaymentHandler {
        ReconcilePaymentHandler::new(
            Arc::new(self.processor.clone()),
            self.entitlements.clone(),
            self.listings.clone(),
        )
    }

    fn enroller(&self) -> EnrollMemberHandler {
        EnrollMemberHandler::new(
            self.memberships.clone(),
            self.listings.clone(),
            self.entitlements.clone(),
            AuthorizationGate::new(self.users.clone()),
        )
    }

    /// Records the customer's payment for the chess club.
    async fn pay_for_club(&self) {
        self.processor
            .add_session(session("cs_paid", Some("pi_paid"), CheckoutStatus::Complete));
        self.reconciler()
            .handle(ReconcilePaymentCommand::new("cs_paid"))
            .await
            .unwrap();
    }
}

fn chess_club() -> Listing {
    let mut listing = Listing::create(
        ListingKind::Club,
        Email::new("manager@x.com").unwrap(),
        NewListing {
            name: "Chess Club".to_string(),
            description: Some("Weekly blitz".to_string()),
            image: None,
            category: Some("games".to_string()),
            location: None,
            price: Money::from_minor(2000),
        },
    )
    .unwrap();
    listing.id = ListingId::parse("club123").unwrap();
    listing.status = ListingStatus::Approved;
    listing
}

fn metadata() -> HashMap<String, String> {
    CheckoutMetadata {
        target_id: ListingId::parse("club123").unwrap(),
        target_name: "Chess Club".to_string(),
        customer_email: Email::new(CUSTOMER).unwrap(),
        purchase_type: ListingKind::Club,
        declared_status: Some("approved".to_string()),
        declared_category: Some("games".to_string()),
    }
    .to_map()
}

fn session(id: &str, intent: Option<&str>, status: CheckoutStatus) -> ProcessorSession {
    ProcessorSession {
        id: id.to_string(),
        payment_intent_id: intent.map(str::to_string),
        status,
        amount_total_minor: Some(2000),
        metadata: metadata(),
    }
}

fn member(email: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(format!("uid-{}", email)).unwrap(),
        Email::new(email).unwrap(),
        None,
        true,
    )
}

// =============================================================================
// Reconciliation
// =============================================================================

#[tokio::test]
async fn completed_session_is_recorded_from_live_listing() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));

    let outcome = fixture
        .reconciler()
        .handle(ReconcilePaymentCommand::new("cs_1"))
        .await
        .unwrap();

    assert_eq!(outcome.message(), MSG_RECORDED);
    let record = outcome.entitlement().unwrap();
    assert_eq!(record.transaction_id.as_str(), "pi_1");
    assert_eq!(record.customer_email.as_str(), CUSTOMER);
    assert_eq!(record.amount, Money::from_minor(2000));
    assert_eq!(record.target.as_ref().map(|t| t.name.as_str()), Some("Chess Club"));
}

#[tokio::test]
async fn second_callback_reports_already_recorded() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));
    let reconciler = fixture.reconciler();

    let first = reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await.unwrap();
    let second = reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await.unwrap();

    assert!(!first.is_duplicate());
    assert!(second.is_duplicate());
    assert_eq!(second.message(), MSG_DUPLICATE);
    assert_eq!(second.transaction_id().map(|t| t.as_str()), Some("pi_1"));
    assert_eq!(second.entitlement(), first.entitlement());
    assert_eq!(fixture.entitlements.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn distinct_sessions_sharing_an_intent_record_once() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));
    fixture
        .processor
        .add_session(session("cs_2", Some("pi_1"), CheckoutStatus::Complete));

    let reconciler = fixture.reconciler();
    reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await.unwrap();
    let again = reconciler.handle(ReconcilePaymentCommand::new("cs_2")).await.unwrap();

    assert!(again.is_duplicate());
    assert_eq!(fixture.entitlements.list_all().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callbacks_record_exactly_one_payment() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));

    let tasks = (0..16).map(|_| {
        let reconciler = fixture.reconciler();
        tokio::spawn(async move { reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await })
    });
    let outcomes: Vec<ReconciliationOutcome> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let recorded = outcomes.iter().filter(|o| !o.is_duplicate()).count();
    assert_eq!(recorded, 1, "exactly one caller records the payment");
    assert!(outcomes
        .iter()
        .all(|o| o.transaction_id().map(|t| t.as_str()) == Some("pi_1")));

    let stored = fixture.entitlements.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].transaction_id.as_str(), "pi_1");
}

#[tokio::test]
async fn open_session_records_nothing() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_open", None, CheckoutStatus::Open));

    let outcome = fixture
        .reconciler()
        .handle(ReconcilePaymentCommand::new("cs_open"))
        .await
        .unwrap();

    assert_eq!(outcome.message(), MSG_NOT_COMPLETE);
    assert!(outcome.transaction_id().is_none());
    assert!(fixture.entitlements.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_completed_later_is_recorded_on_retry() {
    let fixture = Fixture::new().await;
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Open));
    let reconciler = fixture.reconciler();

    let early = reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await.unwrap();
    assert_eq!(early.message(), MSG_NOT_COMPLETE);

    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));
    let later = reconciler.handle(ReconcilePaymentCommand::new("cs_1")).await.unwrap();

    assert_eq!(later.message(), MSG_RECORDED);
    assert_eq!(fixture.entitlements.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleted_listing_is_recorded_from_metadata() {
    let fixture = Fixture::new().await;
    fixture
        .listings
        .delete(&ListingId::parse("club123").unwrap())
        .await
        .unwrap();
    fixture
        .processor
        .add_session(session("cs_1", Some("pi_1"), CheckoutStatus::Complete));

    let outcome = fixture
        .reconciler()
        .handle(ReconcilePaymentCommand::new("cs_1"))
        .await
        .unwrap();

    let record = outcome.entitlement().unwrap();
    assert!(record.target.is_none());
    assert_eq!(record.name, "Chess Club");
    assert_eq!(record.target_id.as_str(), "club123");
}

#[tokio::test]
async fn unknown_session_is_upstream_error() {
    let fixture = Fixture::new().await;

    let result = fixture
        .reconciler()
        .handle(ReconcilePaymentCommand::new("cs_missing"))
        .await;

    assert!(matches!(result, Err(ClubSphereError::UpstreamPayment { .. })));
    assert!(fixture.entitlements.list_all().await.unwrap().is_empty());
}

// =============================================================================
// Enrollment
// =============================================================================

#[tokio::test]
async fn joining_twice_reports_already_joined() {
    let fixture = Fixture::new().await;
    fixture.pay_for_club().await;
    let enroller = fixture.enroller();
    let cmd = EnrollMemberCommand {
        caller: member(CUSTOMER),
        club_id: "club123".to_string(),
        member_email: CUSTOMER.to_string(),
    };

    let first = enroller.handle(cmd.clone()).await.unwrap();
    let second = enroller.handle(cmd).await.unwrap();

    assert!(!first.is_already_joined());
    assert!(second.is_already_joined());
    assert_eq!(second.message(), MSG_ALREADY_JOINED);
    assert_eq!(second.membership().id, first.membership().id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_create_one_membership() {
    let fixture = Fixture::new().await;
    fixture.pay_for_club().await;

    let tasks = (0..16).map(|_| {
        let enroller = fixture.enroller();
        tokio::spawn(async move {
            enroller
                .handle(EnrollMemberCommand {
                    caller: member(CUSTOMER),
                    club_id: "club123".to_string(),
                    member_email: CUSTOMER.to_string(),
                })
                .await
        })
    });
    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| !o.is_already_joined()).count(), 1);
    let stored = fixture
        .memberships
        .list_by_member(&Email::new(CUSTOMER).unwrap())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn joining_paid_club_requires_recorded_payment() {
    let fixture = Fixture::new().await;
    let cmd = EnrollMemberCommand {
        caller: member(CUSTOMER),
        club_id: "club123".to_string(),
        member_email: CUSTOMER.to_string(),
    };

    let unpaid = fixture.enroller().handle(cmd.clone()).await;
    assert!(matches!(unpaid, Err(ClubSphereError::NotPermitted(_))));

    fixture.pay_for_club().await;
    let paid = fixture.enroller().handle(cmd).await.unwrap();
    assert!(!paid.is_already_joined());
}

#[tokio::test]
async fn joining_pending_club_is_not_found() {
    let fixture = Fixture::new().await;
    fixture.pay_for_club().await;
    fixture
        .listings
        .update_status(&ListingId::parse("club123").unwrap(), ListingStatus::Pending)
        .await
        .unwrap();

    let result = fixture
        .enroller()
        .handle(EnrollMemberCommand {
            caller: member(CUSTOMER),
            club_id: "club123".to_string(),
            member_email: CUSTOMER.to_string(),
        })
        .await;

    assert!(matches!(result, Err(ClubSphereError::NotFound(_))));
}

#[tokio::test]
async fn joining_for_someone_else_is_forbidden() {
    let fixture = Fixture::new().await;

    let result = fixture
        .enroller()
        .handle(EnrollMemberCommand {
            caller: member(CUSTOMER),
            club_id: "club123".to_string(),
            member_email: "b@x.com".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(ClubSphereError::Forbidden { .. } | ClubSphereError::NotPermitted(_))
    ));
    assert!(fixture
        .memberships
        .list_by_member(&Email::new("b@x.com").unwrap())
        .await
        .unwrap()
        .is_empty());
}
