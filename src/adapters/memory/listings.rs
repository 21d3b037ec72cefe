//! In-memory club and event store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{Listing, ListingStatus};
use crate::domain::foundation::{DomainError, Email, ErrorCode, ListingId};
use crate::ports::{ListingQuery, ListingRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryListingRepository {
    listings: Arc<RwLock<Vec<Listing>>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first; ties keep reverse insertion order.
    fn newest_first<'a>(listings: impl DoubleEndedIterator<Item = &'a Listing>) -> Vec<Listing> {
        let mut out: Vec<Listing> = listings.rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), DomainError> {
        let mut listings = self.listings.write().await;
        if listings.iter().any(|l| l.id == listing.id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Listing {} already exists", listing.id),
            ));
        }
        listings.push(listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        Ok(self
            .listings
            .read()
            .await
            .iter()
            .find(|l| &l.id == id)
            .cloned())
    }

    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DomainError> {
        let listings = self.listings.read().await;
        let mut matched = Self::newest_first(listings.iter().filter(|l| query.matches(l)));
        matched.truncate(query.limit as usize);
        Ok(matched)
    }

    async fn list_by_manager(&self, manager: &Email) -> Result<Vec<Listing>, DomainError> {
        let listings = self.listings.read().await;
        Ok(Self::newest_first(
            listings.iter().filter(|l| l.is_owned_by(manager)),
        ))
    }

    async fn update_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<bool, DomainError> {
        let mut listings = self.listings.write().await;
        match listings.iter_mut().find(|l| &l.id == id) {
            Some(listing) => {
                listing.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, DomainError> {
        let mut listings = self.listings.write().await;
        let before = listings.len();
        listings.retain(|l| &l.id != id);
        Ok(listings.len() != before)
    }
}
