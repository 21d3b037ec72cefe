//! User repository port.
//!
//! Users are keyed by email. The Role Resolver reads from this port and the
//! admin role update writes to it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Email, Role};
use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// Inserts the user, or replaces `name`, `image` and `last_login` if one exists.
    ///
    /// `role` and `created_at` of an existing record are never overwritten.
    async fn upsert_login(&self, user: &User) -> Result<User, DomainError>;

    /// Sets the role of an existing user. Returns `false` if no user has that email.
    async fn update_role(&self, email: &Email, role: Role) -> Result<bool, DomainError>;

    /// Lists users ordered by creation time, newest first, excluding `except`.
    async fn list_except(&self, except: &Email) -> Result<Vec<User>, DomainError>;
}
