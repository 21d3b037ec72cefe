//! EnrollMemberHandler - Command handler for joining a club.

use std::sync::Arc;

use crate::application::authorization::AuthorizationGate;
use crate::application::ClubSphereError;
use crate::domain::catalog::{Listing, ListingKind};
use crate::domain::foundation::{AuthenticatedUser, Email, ListingId, Role};
use crate::domain::membership::{ClubMembership, EnrollmentOutcome};
use crate::ports::{EntitlementRepository, ListingRepository, MembershipRepository, SaveResult};

/// Command to enroll a member in a club.
#[derive(Debug, Clone)]
pub struct EnrollMemberCommand {
    pub caller: AuthenticatedUser,
    pub club_id: String,
    pub member_email: String,
}

/// Handler for membership enrollment.
///
/// The club must be visible to the caller, and a priced club must already
/// carry a payment record for the caller. Then check-then-insert on
/// (club, member). The check only shapes the response; the store's unique
/// constraint decides who wins a race.
pub struct EnrollMemberHandler {
    memberships: Arc<dyn MembershipRepository>,
    listings: Arc<dyn ListingRepository>,
    entitlements: Arc<dyn EntitlementRepository>,
    gate: AuthorizationGate,
}

impl EnrollMemberHandler {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        listings: Arc<dyn ListingRepository>,
        entitlements: Arc<dyn EntitlementRepository>,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            memberships,
            listings,
            entitlements,
            gate,
        }
    }

    pub async fn handle(&self, cmd: EnrollMemberCommand) -> Result<EnrollmentOutcome, ClubSphereError> {
        let club_id = ListingId::parse(cmd.club_id)?;
        let member_email = Email::new(&cmd.member_email)?;

        if member_email != cmd.caller.email {
            return Err(ClubSphereError::not_permitted(
                "memberEmail must match the signed-in user",
            ));
        }

        // 1. Club must exist and be visible to the caller
        let club = self
            .listings
            .find_by_id(&club_id)
            .await?
            .filter(|listing| listing.kind == ListingKind::Club)
            .ok_or_else(|| ClubSphereError::not_found("Club"))?;
        self.ensure_visible(&club, &member_email).await?;

        // 2. Fast path for the common repeat
        if let Some(existing) = self.memberships.find(&club_id, &member_email).await? {
            tracing::info!(club_id = %club_id, member = %member_email, "Already joined");
            return Ok(EnrollmentOutcome::AlreadyJoined(existing));
        }

        // 3. Priced clubs are joined only after a recorded payment
        if !club.is_free() && !self.has_paid(&member_email, &club_id).await? {
            tracing::warn!(club_id = %club_id, member = %member_email, "Join without payment");
            return Err(ClubSphereError::not_permitted(
                "a paid club can only be joined after payment",
            ));
        }

        // 4. Insert; a conflict means a concurrent call got there first
        let membership = ClubMembership::enroll(club_id.clone(), member_email.clone());
        let outcome = match self.memberships.insert(&membership).await? {
            SaveResult::Inserted => EnrollmentOutcome::Joined(membership),
            SaveResult::AlreadyExists => {
                let existing = self
                    .memberships
                    .find(&club_id, &member_email)
                    .await?
                    .ok_or_else(|| {
                        ClubSphereError::store("Membership conflicted on insert but cannot be read back")
                    })?;
                EnrollmentOutcome::AlreadyJoined(existing)
            }
        };

        tracing::info!(
            club_id = %club_id,
            member = %member_email,
            already_joined = outcome.is_already_joined(),
            "Enrollment handled"
        );
        Ok(outcome)
    }

    /// Hidden clubs are reported as not found, as on the public read path.
    async fn ensure_visible(&self, club: &Listing, caller: &Email) -> Result<(), ClubSphereError> {
        if club.is_visible_to(Some(caller), Role::Customer) {
            return Ok(());
        }
        let role = self.gate.resolve_role(caller).await?;
        if club.is_visible_to(Some(caller), role) {
            Ok(())
        } else {
            Err(ClubSphereError::not_found("Club"))
        }
    }

    async fn has_paid(&self, customer: &Email, club_id: &ListingId) -> Result<bool, ClubSphereError> {
        let paid = self.entitlements.list_by_customer(customer).await?;
        Ok(paid.iter().any(|record| &record.target_id == club_id))
    }
}
