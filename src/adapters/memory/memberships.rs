//! In-memory membership store, unique per (club, member).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, ListingId};
use crate::domain::membership::ClubMembership;
use crate::ports::{MembershipRepository, SaveResult};

type MembershipKey = (ListingId, Email);

#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipRepository {
    memberships: Arc<RwLock<HashMap<MembershipKey, ClubMembership>>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memberships.
    pub async fn len(&self) -> usize {
        self.memberships.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memberships.read().await.is_empty()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn find(
        &self,
        club_id: &ListingId,
        member: &Email,
    ) -> Result<Option<ClubMembership>, DomainError> {
        let key = (club_id.clone(), member.clone());
        Ok(self.memberships.read().await.get(&key).cloned())
    }

    async fn insert(&self, membership: &ClubMembership) -> Result<SaveResult, DomainError> {
        let key = (membership.club_id.clone(), membership.member_email.clone());
        let mut memberships = self.memberships.write().await;
        if memberships.contains_key(&key) {
            return Ok(SaveResult::AlreadyExists);
        }
        memberships.insert(key, membership.clone());
        Ok(SaveResult::Inserted)
    }

    async fn list_by_member(&self, member: &Email) -> Result<Vec<ClubMembership>, DomainError> {
        let memberships = self.memberships.read().await;
        let mut listed: Vec<ClubMembership> = memberships
            .values()
            .filter(|m| &m.member_email == member)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(listed)
    }
}
