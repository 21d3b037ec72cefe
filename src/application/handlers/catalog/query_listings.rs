//! Listing queries: public catalog, single listing and manager's own listings.

use std::sync::Arc;

use crate::application::{AuthorizationGate, ClubSphereError};
use crate::domain::catalog::{Listing, ListingKind};
use crate::domain::foundation::{AuthenticatedUser, Email, ListingId, Role};
use crate::ports::{ListingQuery, ListingRepository};

/// Public catalog query. Only approved listings are returned.
#[derive(Debug, Clone, Default)]
pub struct ListListingsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

pub struct ListListingsHandler {
    listings: Arc<dyn ListingRepository>,
}

impl ListListingsHandler {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(
        &self,
        kind: ListingKind,
        query: ListListingsQuery,
    ) -> Result<Vec<Listing>, ClubSphereError> {
        let mut filter = ListingQuery::approved(kind);
        filter.category = query.category.filter(|c| !c.trim().is_empty());
        filter.search = query.search.filter(|s| !s.trim().is_empty());
        filter.limit = query
            .limit
            .unwrap_or(ListingQuery::DEFAULT_LIMIT)
            .clamp(1, ListingQuery::MAX_LIMIT);

        Ok(self.listings.search(&filter).await?)
    }
}

/// Single listing, subject to the visibility rule.
pub struct GetListingHandler {
    listings: Arc<dyn ListingRepository>,
    gate: AuthorizationGate,
}

impl GetListingHandler {
    pub fn new(listings: Arc<dyn ListingRepository>, gate: AuthorizationGate) -> Self {
        Self { listings, gate }
    }

    /// Hidden listings are reported as not found rather than forbidden.
    pub async fn handle(
        &self,
        kind: ListingKind,
        id: String,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<Listing, ClubSphereError> {
        let id = ListingId::parse(id)?;
        let listing = self
            .listings
            .find_by_id(&id)
            .await?
            .filter(|l| l.kind == kind)
            .ok_or_else(|| ClubSphereError::not_found(kind.label()))?;

        let role = match viewer {
            Some(user) => self.gate.resolve_role(&user.email).await?,
            None => Role::Customer,
        };

        if !listing.is_visible_to(viewer.map(|u| &u.email), role) {
            return Err(ClubSphereError::not_found(kind.label()));
        }
        Ok(listing)
    }
}

pub struct ListManagerListingsHandler {
    listings: Arc<dyn ListingRepository>,
}

impl ListManagerListingsHandler {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, manager: &Email) -> Result<Vec<Listing>, ClubSphereError> {
        Ok(self.listings.list_by_manager(manager).await?)
    }
}
