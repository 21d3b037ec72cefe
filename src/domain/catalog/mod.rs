//! Catalog module - clubs and events offered on the platform.

mod listing;

pub use listing::{Listing, ListingKind, ListingStatus, NewListing};
