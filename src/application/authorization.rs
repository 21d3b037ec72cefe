//! Role Resolver and Authorization Gate.
//!
//! Identity verification happens in the HTTP middleware before anything
//! here runs. The gate then resolves the caller's stored role and compares it
//! with the role an operation requires. Both steps only read from the store.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, Email, Role};
use crate::ports::UserRepository;

use super::ClubSphereError;

/// Looks up stored roles and admits or denies callers by required role.
#[derive(Clone)]
pub struct AuthorizationGate {
    users: Arc<dyn UserRepository>,
}

impl AuthorizationGate {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Returns the stored role for `email`.
    ///
    /// A caller without a user record is a customer; absence is never an error.
    pub async fn resolve_role(&self, email: &Email) -> Result<Role, ClubSphereError> {
        let role = self
            .users
            .find_by_email(email)
            .await?
            .map(|user| user.role)
            .unwrap_or_default();
        Ok(role)
    }

    /// Admits `user` only when their stored role equals `required`.
    ///
    /// Returns the resolved role on success so callers can reuse it.
    pub async fn require_role(
        &self,
        user: &AuthenticatedUser,
        required: Role,
    ) -> Result<Role, ClubSphereError> {
        let actual = self.resolve_role(&user.email).await?;
        if !actual.satisfies(required) {
            tracing::warn!(
                email = %user.email,
                required = %required,
                actual = %actual,
                "Role check denied"
            );
            return Err(ClubSphereError::forbidden(required, actual));
        }
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{DomainError, UserId};
    use crate::domain::user::User;
    use async_trait::async_trait;

    fn caller(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("uid").unwrap(),
            Email::new(email).unwrap(),
            None,
            true,
        )
    }

    async fn gate_with(email: &str, role: Role) -> AuthorizationGate {
        let users = Arc::new(InMemoryUserRepository::new());
        let mut user = User::register(Email::new(email).unwrap(), None, None);
        user.change_role(role);
        users.upsert_login(&user).await.unwrap();
        users.update_role(&user.email, role).await.unwrap();
        AuthorizationGate::new(users)
    }

    struct FailingUsers;

    #[async_trait]
    impl UserRepository for FailingUsers {
        async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, DomainError> {
            Err(DomainError::database("store down"))
        }
        async fn upsert_login(&self, user: &User) -> Result<User, DomainError> {
            Ok(user.clone())
        }
        async fn update_role(&self, _email: &Email, _role: Role) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn list_except(&self, _except: &Email) -> Result<Vec<User>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn unknown_user_resolves_to_customer() {
        let gate = AuthorizationGate::new(Arc::new(InMemoryUserRepository::new()));
        let role = gate
            .resolve_role(&Email::new("nobody@x.com").unwrap())
            .await
            .unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[tokio::test]
    async fn matching_role_is_admitted() {
        let gate = gate_with("admin@x.com", Role::Admin).await;
        let role = gate
            .require_role(&caller("admin@x.com"), Role::Admin)
            .await
            .unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[tokio::test]
    async fn mismatched_role_is_forbidden_with_actual_role() {
        let gate = gate_with("c@x.com", Role::Customer).await;
        let err = gate
            .require_role(&caller("c@x.com"), Role::Admin)
            .await
            .unwrap_err();
        assert_eq!(err, ClubSphereError::forbidden(Role::Admin, Role::Customer));
    }

    #[tokio::test]
    async fn admin_does_not_pass_manager_gate() {
        let gate = gate_with("admin@x.com", Role::Admin).await;
        let err = gate
            .require_role(&caller("admin@x.com"), Role::Manager)
            .await
            .unwrap_err();
        assert_eq!(err, ClubSphereError::forbidden(Role::Manager, Role::Admin));
    }

    #[tokio::test]
    async fn store_failure_is_not_treated_as_customer() {
        let gate = AuthorizationGate::new(Arc::new(FailingUsers));
        let err = gate
            .resolve_role(&Email::new("a@x.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClubSphereError::Store(_)));
    }
}
