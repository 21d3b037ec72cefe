//! Club membership repository port.
//!
//! Unique constraint: one membership per (club, member). Implementations
//! enforce it at the store and report duplicates as `SaveResult::AlreadyExists`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Email, ListingId};
use crate::domain::membership::ClubMembership;

use super::SaveResult;

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find(
        &self,
        club_id: &ListingId,
        member: &Email,
    ) -> Result<Option<ClubMembership>, DomainError>;

    async fn insert(&self, membership: &ClubMembership) -> Result<SaveResult, DomainError>;

    /// Memberships of `member`, newest first.
    async fn list_by_member(&self, member: &Email) -> Result<Vec<ClubMembership>, DomainError>;
}
