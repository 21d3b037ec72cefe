//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::catalog::{
    CreateListingHandler, DeleteListingHandler, GetListingHandler, ListListingsHandler,
    ListManagerListingsHandler, UpdateListingStatusHandler,
};
use crate::application::handlers::membership::{
    EnrollMemberHandler, GetMembershipHandler, ListMembershipsHandler,
};
use crate::application::handlers::payment::{
    CheckoutSettings, CreateCheckoutSessionHandler, ListPaymentsHandler, ReconcilePaymentHandler,
};
use crate::application::handlers::user::{
    GetRoleHandler, ListRoleRequestsHandler, ListUsersHandler, RecordLoginHandler,
    RequestManagerRoleHandler, UpdateRoleHandler,
};
use crate::application::AuthorizationGate;
use crate::domain::foundation::Role;
use crate::ports::{
    EntitlementRepository, IdentityVerifier, ListingRepository, MembershipRepository,
    PaymentProcessor, RoleRequestRepository, UserRepository,
};

use super::middleware::RequiredRole;

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityVerifier>,
    pub users: Arc<dyn UserRepository>,
    pub role_requests: Arc<dyn RoleRequestRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub entitlements: Arc<dyn EntitlementRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub checkout: CheckoutSettings,
}

impl AppState {
    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(self.users.clone())
    }

    /// State for a `require_role` route layer demanding `role`.
    pub fn required(&self, role: Role) -> RequiredRole {
        RequiredRole::new(self.gate(), role)
    }

    // Payments

    pub fn create_checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(self.processor.clone(), self.checkout.clone())
    }

    pub fn reconcile_handler(&self) -> ReconcilePaymentHandler {
        ReconcilePaymentHandler::new(
            self.processor.clone(),
            self.entitlements.clone(),
            self.listings.clone(),
        )
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.entitlements.clone())
    }

    // Memberships

    pub fn enroll_handler(&self) -> EnrollMemberHandler {
        EnrollMemberHandler::new(
            self.memberships.clone(),
            self.listings.clone(),
            self.entitlements.clone(),
            self.gate(),
        )
    }

    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.memberships.clone())
    }

    pub fn list_memberships_handler(&self) -> ListMembershipsHandler {
        ListMembershipsHandler::new(self.memberships.clone())
    }

    // Users

    pub fn record_login_handler(&self) -> RecordLoginHandler {
        RecordLoginHandler::new(self.users.clone())
    }

    pub fn get_role_handler(&self) -> GetRoleHandler {
        GetRoleHandler::new(self.gate())
    }

    pub fn request_manager_handler(&self) -> RequestManagerRoleHandler {
        RequestManagerRoleHandler::new(self.role_requests.clone())
    }

    pub fn list_role_requests_handler(&self) -> ListRoleRequestsHandler {
        ListRoleRequestsHandler::new(self.role_requests.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone())
    }

    pub fn update_role_handler(&self) -> UpdateRoleHandler {
        UpdateRoleHandler::new(self.users.clone(), self.role_requests.clone())
    }

    // Listings

    pub fn create_listing_handler(&self) -> CreateListingHandler {
        CreateListingHandler::new(self.listings.clone())
    }

    pub fn list_listings_handler(&self) -> ListListingsHandler {
        ListListingsHandler::new(self.listings.clone())
    }

    pub fn get_listing_handler(&self) -> GetListingHandler {
        GetListingHandler::new(self.listings.clone(), self.gate())
    }

    pub fn manager_listings_handler(&self) -> ListManagerListingsHandler {
        ListManagerListingsHandler::new(self.listings.clone())
    }

    pub fn update_status_handler(&self) -> UpdateListingStatusHandler {
        UpdateListingStatusHandler::new(self.listings.clone())
    }

    pub fn delete_listing_handler(&self) -> DeleteListingHandler {
        DeleteListingHandler::new(self.listings.clone())
    }
}
