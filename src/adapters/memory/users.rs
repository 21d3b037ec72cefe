//! In-memory user store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, Role};
use crate::domain::user::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Email, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user with a given role (useful for tests).
    pub async fn seed(&self, email: Email, role: Role) -> User {
        let mut user = User::register(email, None, None);
        user.change_role(role);
        self.users
            .write()
            .await
            .insert(user.email.clone(), user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn upsert_login(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let stored = users
            .entry(user.email.clone())
            .and_modify(|existing| {
                existing.record_login(user.name.clone(), user.image.clone());
                existing.last_login = user.last_login;
            })
            .or_insert_with(|| user.clone());
        Ok(stored.clone())
    }

    async fn update_role(&self, email: &Email, role: Role) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            Some(user) => {
                user.change_role(role);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_except(&self, except: &Email) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = users
            .values()
            .filter(|u| &u.email != except)
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(listed)
    }
}
