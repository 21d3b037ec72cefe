//! Email address value object.
//!
//! Emails are the identity key across the system: users, role requests,
//! memberships and payments are all addressed by the caller's email. The
//! value is trimmed and lowercased on construction so that lookups never
//! depend on how a client happened to capitalise an address.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Normalised email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and normalises an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = raw.as_ref().trim().to_lowercase();
        if value.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format(
                "email",
                "expected local@domain",
            ));
        }

        Ok(Self(value))
    }

    /// Returns the normalised address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalises_case_and_whitespace() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Email::new("   "), Err(ValidationError::empty_field("email")));
    }

    #[test]
    fn rejects_missing_at() {
        assert!(Email::new("alice.example.com").is_err());
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("alice@").is_err());
        assert!(Email::new("a@b@c").is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Email = serde_json::from_str("\"B@X.com\"").unwrap();
        assert_eq!(ok.as_str(), "b@x.com");

        let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn equal_up_to_case(local in "[a-zA-Z0-9]{1,12}", domain in "[a-zA-Z]{1,10}\\.[a-z]{2,3}") {
            let lower = Email::new(format!("{}@{}", local.to_lowercase(), domain.to_lowercase())).unwrap();
            let mixed = Email::new(format!("{}@{}", local.to_uppercase(), domain)).unwrap();
            prop_assert_eq!(lower, mixed);
        }
    }
}
