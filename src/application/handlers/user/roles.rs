//! Role handlers: lookup, manager requests and admin role updates.

use std::sync::Arc;

use crate::application::{AuthorizationGate, ClubSphereError};
use crate::domain::foundation::{Email, Role};
use crate::domain::user::{RoleChangeRequest, User};
use crate::ports::{RoleRequestRepository, SaveResult, UserRepository};

pub const MSG_ALREADY_REQUESTED: &str = "Already requested, please wait.";

/// Role Resolver exposed as a query.
pub struct GetRoleHandler {
    gate: AuthorizationGate,
}

impl GetRoleHandler {
    pub fn new(gate: AuthorizationGate) -> Self {
        Self { gate }
    }

    pub async fn handle(&self, email: &Email) -> Result<Role, ClubSphereError> {
        self.gate.resolve_role(email).await
    }
}

/// Files a request to become a manager; one per email.
pub struct RequestManagerRoleHandler {
    requests: Arc<dyn RoleRequestRepository>,
}

impl RequestManagerRoleHandler {
    pub fn new(requests: Arc<dyn RoleRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self, email: Email) -> Result<RoleChangeRequest, ClubSphereError> {
        let request = RoleChangeRequest::manager(email);
        match self.requests.insert(&request).await? {
            SaveResult::Inserted => {
                tracing::info!(email = %request.email, "Manager role requested");
                Ok(request)
            }
            SaveResult::AlreadyExists => Err(ClubSphereError::conflict(MSG_ALREADY_REQUESTED)),
        }
    }
}

pub struct ListRoleRequestsHandler {
    requests: Arc<dyn RoleRequestRepository>,
}

impl ListRoleRequestsHandler {
    pub fn new(requests: Arc<dyn RoleRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self) -> Result<Vec<RoleChangeRequest>, ClubSphereError> {
        Ok(self.requests.list().await?)
    }
}

/// Lists every user except the admin asking.
pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, caller: &Email) -> Result<Vec<User>, ClubSphereError> {
        Ok(self.users.list_except(caller).await?)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRoleCommand {
    pub email: String,
    pub role: String,
}

/// Sets a user's role and clears any pending request from that user.
pub struct UpdateRoleHandler {
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn RoleRequestRepository>,
}

impl UpdateRoleHandler {
    pub fn new(users: Arc<dyn UserRepository>, requests: Arc<dyn RoleRequestRepository>) -> Self {
        Self { users, requests }
    }

    pub async fn handle(&self, cmd: UpdateRoleCommand) -> Result<User, ClubSphereError> {
        let email = Email::new(&cmd.email)?;
        let role: Role = cmd.role.parse()?;

        if !self.users.update_role(&email, role).await? {
            return Err(ClubSphereError::not_found("User"));
        }

        let cleared = self.requests.delete(&email).await?;
        tracing::info!(email = %email, role = %role, request_cleared = cleared, "Role updated");

        self.users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ClubSphereError::not_found("User"))
    }
}
