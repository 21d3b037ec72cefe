//! User account record.

use serde::Serialize;

use crate::domain::foundation::{Email, Role, Timestamp};

/// A registered user, keyed by email.
///
/// Created on first login with role `Customer`. The role only changes through
/// an admin role update; a later login never resets it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: Email,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: Timestamp,
    pub last_login: Timestamp,
}

impl User {
    /// Registers a first-time user as a customer.
    pub fn register(email: Email, name: Option<String>, image: Option<String>) -> Self {
        let now = Timestamp::now();
        Self {
            email,
            name,
            image,
            role: Role::Customer,
            created_at: now,
            last_login: now,
        }
    }

    /// Refreshes the login time; profile fields are only overwritten when supplied.
    pub fn record_login(&mut self, name: Option<String>, image: Option<String>) {
        self.last_login = Timestamp::now();
        if name.is_some() {
            self.name = name;
        }
        if image.is_some() {
            self.image = image;
        }
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
    }
}
