//! Club membership record.

use serde::Serialize;

use crate::domain::foundation::{Email, ListingId, MembershipId, Timestamp};

pub const MSG_ALREADY_JOINED: &str = "You have already joined this club.";
pub const MSG_JOINED: &str = "Membership created.";

/// A member's enrollment in a club. Unique per (club, member).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubMembership {
    pub id: MembershipId,
    pub club_id: ListingId,
    pub member_email: Email,
    pub joined_at: Timestamp,
}

impl ClubMembership {
    pub fn enroll(club_id: ListingId, member_email: Email) -> Self {
        Self {
            id: MembershipId::new(),
            club_id,
            member_email,
            joined_at: Timestamp::now(),
        }
    }
}

/// Result of an enrollment request.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollmentOutcome {
    Joined(ClubMembership),
    AlreadyJoined(ClubMembership),
}

impl EnrollmentOutcome {
    pub fn membership(&self) -> &ClubMembership {
        match self {
            EnrollmentOutcome::Joined(m) | EnrollmentOutcome::AlreadyJoined(m) => m,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EnrollmentOutcome::Joined(_) => MSG_JOINED,
            EnrollmentOutcome::AlreadyJoined(_) => MSG_ALREADY_JOINED,
        }
    }

    pub fn is_already_joined(&self) -> bool {
        matches!(self, EnrollmentOutcome::AlreadyJoined(_))
    }
}
