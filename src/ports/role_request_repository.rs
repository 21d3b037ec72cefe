//! Role change request repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Email};
use crate::domain::user::RoleChangeRequest;

use super::SaveResult;

#[async_trait]
pub trait RoleRequestRepository: Send + Sync {
    /// Inserts the request; `AlreadyExists` if the email already has one pending.
    async fn insert(&self, request: &RoleChangeRequest) -> Result<SaveResult, DomainError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<RoleChangeRequest>, DomainError>;

    /// Lists pending requests, oldest first.
    async fn list(&self) -> Result<Vec<RoleChangeRequest>, DomainError>;

    /// Removes the request for `email`. Returns `false` if none was pending.
    async fn delete(&self, email: &Email) -> Result<bool, DomainError>;
}
