//! RecordLoginHandler - Registers a user on first sight and refreshes later logins.

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::user::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct RecordLoginCommand {
    pub caller: AuthenticatedUser,
    pub name: Option<String>,
    pub image: Option<String>,
}

pub struct RecordLoginHandler {
    users: Arc<dyn UserRepository>,
}

impl RecordLoginHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: RecordLoginCommand) -> Result<User, ClubSphereError> {
        let name = cmd.name.or_else(|| cmd.caller.display_name.clone());

        let user = match self.users.find_by_email(&cmd.caller.email).await? {
            Some(mut existing) => {
                existing.record_login(name, cmd.image);
                existing
            }
            None => {
                tracing::info!(email = %cmd.caller.email, "Registering new user");
                User::register(cmd.caller.email.clone(), name, cmd.image)
            }
        };

        Ok(self.users.upsert_login(&user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{Email, Role, UserId};

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("uid").unwrap(),
            Email::new("a@x.com").unwrap(),
            Some("Ann".to_string()),
            true,
        )
    }

    fn command() -> RecordLoginCommand {
        RecordLoginCommand {
            caller: caller(),
            name: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn first_login_registers_customer() {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = RecordLoginHandler::new(users.clone())
            .handle(command())
            .await
            .unwrap();

        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name.as_deref(), Some("Ann"));
        assert!(users.find_by_email(&user.email).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn later_login_keeps_role_and_created_at() {
        let users = Arc::new(InMemoryUserRepository::new());
        let handler = RecordLoginHandler::new(users.clone());

        let first = handler.handle(command()).await.unwrap();
        users.update_role(&first.email, Role::Manager).await.unwrap();

        let second = handler.handle(command()).await.unwrap();

        assert_eq!(second.role, Role::Manager);
        assert_eq!(second.created_at, first.created_at);
        assert!(!second.last_login.is_before(&first.last_login));
    }
}
