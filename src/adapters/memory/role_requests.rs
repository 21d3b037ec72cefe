//! In-memory role change request store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email};
use crate::domain::user::RoleChangeRequest;
use crate::ports::{RoleRequestRepository, SaveResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleRequestRepository {
    // Insertion order doubles as request order.
    requests: Arc<RwLock<Vec<RoleChangeRequest>>>,
}

impl InMemoryRoleRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRequestRepository for InMemoryRoleRequestRepository {
    async fn insert(&self, request: &RoleChangeRequest) -> Result<SaveResult, DomainError> {
        let mut requests = self.requests.write().await;
        if requests.iter().any(|r| r.email == request.email) {
            return Ok(SaveResult::AlreadyExists);
        }
        requests.push(request.clone());
        Ok(SaveResult::Inserted)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<RoleChangeRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .find(|r| &r.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<RoleChangeRequest>, DomainError> {
        Ok(self.requests.read().await.clone())
    }

    async fn delete(&self, email: &Email) -> Result<bool, DomainError> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| &r.email != email);
        Ok(requests.len() != before)
    }
}
