//! Listing repository port for clubs and events.

use async_trait::async_trait;

use crate::domain::catalog::{Listing, ListingKind, ListingStatus};
use crate::domain::foundation::{DomainError, Email, ListingId};

/// Filter for public listing queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub kind: ListingKind,
    pub status: Option<ListingStatus>,
    pub category: Option<String>,
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
    pub limit: u32,
}

impl ListingQuery {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 100;

    /// Approved listings of one kind, the customer-facing default.
    pub fn approved(kind: ListingKind) -> Self {
        Self {
            kind,
            status: Some(ListingStatus::Approved),
            category: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Returns true if `listing` passes every filter of this query (ignores `limit`).
    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.kind != self.kind {
            return false;
        }
        if let Some(status) = self.status {
            if listing.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if listing.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !listing.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError>;

    /// Listings matching `query`, newest first.
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DomainError>;

    /// All listings owned by `manager`, newest first.
    async fn list_by_manager(&self, manager: &Email) -> Result<Vec<Listing>, DomainError>;

    /// Returns `false` if the listing does not exist.
    async fn update_status(
        &self,
        id: &ListingId,
        status: ListingStatus,
    ) -> Result<bool, DomainError>;

    /// Returns `false` if the listing does not exist.
    async fn delete(&self, id: &ListingId) -> Result<bool, DomainError>;
}
