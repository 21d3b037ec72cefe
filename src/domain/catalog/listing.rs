//! Club and event listings.
//!
//! Clubs and events share one record shape; `ListingKind` tells them apart.
//! A listing is created `Pending` by a manager and becomes visible to
//! customers only once an admin approves it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Email, ListingId, Money, Role, Timestamp, ValidationError};

/// Whether a listing is a club or an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Club,
    Event,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Club => "club",
            ListingKind::Event => "event",
        }
    }

    /// Capitalised name for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ListingKind::Club => "Club",
            ListingKind::Event => "Event",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "club" | "membership" => Ok(ListingKind::Club),
            "event" => Ok(ListingKind::Event),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown listing type '{}'", other),
            )),
        }
    }
}

/// Moderation status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ListingStatus::Pending),
            "approved" => Ok(ListingStatus::Approved),
            "rejected" => Ok(ListingStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// Manager-supplied fields of a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub price: Money,
}

/// A club or event record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub kind: ListingKind,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub price: Money,
    pub manager_email: Email,
    pub status: ListingStatus,
    pub created_at: Timestamp,
}

impl Listing {
    /// Creates a pending listing owned by `manager_email`.
    pub fn create(
        kind: ListingKind,
        manager_email: Email,
        fields: NewListing,
    ) -> Result<Self, ValidationError> {
        let name = fields.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id: ListingId::new(),
            kind,
            name,
            description: fields.description,
            image: fields.image,
            category: fields.category,
            location: fields.location,
            price: fields.price,
            manager_email,
            status: ListingStatus::Pending,
            created_at: Timestamp::now(),
        })
    }

    pub fn is_owned_by(&self, email: &Email) -> bool {
        &self.manager_email == email
    }

    pub fn is_free(&self) -> bool {
        !self.price.is_positive()
    }

    /// Approved listings are public; others are visible only to their owner and admins.
    pub fn is_visible_to(&self, viewer: Option<&Email>, role: Role) -> bool {
        if self.status == ListingStatus::Approved || role == Role::Admin {
            return true;
        }
        viewer.map(|email| self.is_owned_by(email)).unwrap_or(false)
    }
}
