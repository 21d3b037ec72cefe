//! Catalog handlers for clubs and events.

mod manage_listing;
mod query_listings;

pub use manage_listing::{
    CreateListingCommand, CreateListingHandler, DeleteListingCommand, DeleteListingHandler,
    UpdateListingStatusCommand, UpdateListingStatusHandler,
};
pub use query_listings::{
    GetListingHandler, ListListingsHandler, ListListingsQuery, ListManagerListingsHandler,
};
