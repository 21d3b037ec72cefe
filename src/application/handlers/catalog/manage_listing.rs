//! Listing commands: create, moderate and delete.

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::catalog::{Listing, ListingKind, ListingStatus, NewListing};
use crate::domain::foundation::{AuthenticatedUser, ListingId, Money};
use crate::ports::ListingRepository;

/// Command to create a club or event, owned by the calling manager.
#[derive(Debug, Clone)]
pub struct CreateListingCommand {
    pub caller: AuthenticatedUser,
    pub kind: ListingKind,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    /// Price in major currency units; zero for free clubs.
    pub price: f64,
}

pub struct CreateListingHandler {
    listings: Arc<dyn ListingRepository>,
}

impl CreateListingHandler {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: CreateListingCommand) -> Result<Listing, ClubSphereError> {
        let listing = Listing::create(
            cmd.kind,
            cmd.caller.email.clone(),
            NewListing {
                name: cmd.name,
                description: cmd.description,
                image: cmd.image,
                category: cmd.category,
                location: cmd.location,
                price: Money::from_major(cmd.price, "price")?,
            },
        )?;

        self.listings.insert(&listing).await?;
        tracing::info!(listing_id = %listing.id, kind = %listing.kind, "Listing created");
        Ok(listing)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateListingStatusCommand {
    pub id: String,
    pub status: String,
}

/// Admin moderation of a listing's status.
pub struct UpdateListingStatusHandler {
    listings: Arc<dyn ListingRepository>,
}

impl UpdateListingStatusHandler {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: UpdateListingStatusCommand) -> Result<Listing, ClubSphereError> {
        let id = ListingId::parse(cmd.id)?;
        let status: ListingStatus = cmd.status.parse()?;

        if !self.listings.update_status(&id, status).await? {
            return Err(ClubSphereError::not_found("Listing"));
        }
        tracing::info!(listing_id = %id, status = %status, "Listing status updated");

        self.listings
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ClubSphereError::not_found("Listing"))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteListingCommand {
    pub caller: AuthenticatedUser,
    pub id: String,
}

/// Deletes a listing; only its owner may.
pub struct DeleteListingHandler {
    listings: Arc<dyn ListingRepository>,
}

impl DeleteListingHandler {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: DeleteListingCommand) -> Result<(), ClubSphereError> {
        let id = ListingId::parse(cmd.id)?;

        let listing = self
            .listings
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ClubSphereError::not_found("Listing"))?;

        if !listing.is_owned_by(&cmd.caller.email) {
            return Err(ClubSphereError::not_permitted(
                "only the owner may delete this listing",
            ));
        }

        if !self.listings.delete(&id).await? {
            return Err(ClubSphereError::not_found("Listing"));
        }
        tracing::info!(listing_id = %id, "Listing deleted");
        Ok(())
    }
}
