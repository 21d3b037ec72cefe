//! Membership queries for the signed-in member.

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::foundation::{Email, ListingId};
use crate::domain::membership::ClubMembership;
use crate::ports::MembershipRepository;

#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub club_id: String,
    pub member_email: Email,
}

pub struct GetMembershipHandler {
    memberships: Arc<dyn MembershipRepository>,
}

impl GetMembershipHandler {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    pub async fn handle(&self, query: GetMembershipQuery) -> Result<ClubMembership, ClubSphereError> {
        let club_id = ListingId::parse(query.club_id)?;
        self.memberships
            .find(&club_id, &query.member_email)
            .await?
            .ok_or_else(|| ClubSphereError::not_found("Membership"))
    }
}

pub struct ListMembershipsHandler {
    memberships: Arc<dyn MembershipRepository>,
}

impl ListMembershipsHandler {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    pub async fn handle(&self, member_email: Email) -> Result<Vec<ClubMembership>, ClubSphereError> {
        Ok(self.memberships.list_by_member(&member_email).await?)
    }
}
