//! Pending request for an elevated role.

use serde::Serialize;

use crate::domain::foundation::{Email, Role, Timestamp};

/// A customer's request to become a manager.
///
/// At most one exists per email. It is removed when an admin updates the
/// requester's role, whether the request was granted or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequest {
    pub email: Email,
    pub requested_role: Role,
    pub requested_at: Timestamp,
}

impl RoleChangeRequest {
    pub fn manager(email: Email) -> Self {
        Self {
            email,
            requested_role: Role::Manager,
            requested_at: Timestamp::now(),
        }
    }
}
