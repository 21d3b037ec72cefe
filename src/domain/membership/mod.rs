//! Membership module - club enrollment.

mod club_membership;

pub use club_membership::{ClubMembership, EnrollmentOutcome, MSG_ALREADY_JOINED, MSG_JOINED};
