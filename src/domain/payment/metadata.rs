//! Checkout metadata contract.
//!
//! Checkout creation and reconciliation happen in separate requests, and the
//! processor session is the only thing they share. The metadata bag attached
//! at creation is echoed back verbatim on retrieval, which makes it the sole
//! link between what was bought and who bought it. Both directions of that
//! mapping live here so the key names cannot drift apart.

use std::collections::HashMap;

use crate::domain::catalog::ListingKind;
use crate::domain::foundation::{Email, ListingId, ValidationError};

pub const KEY_STATUS: &str = "status";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_TARGET_ID: &str = "targetId";
pub const KEY_TARGET_NAME: &str = "targetName";
pub const KEY_CUSTOMER: &str = "customer";
pub const KEY_TYPE: &str = "type";

/// Typed view of the processor metadata bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMetadata {
    pub target_id: ListingId,
    pub target_name: String,
    pub customer_email: Email,
    pub purchase_type: ListingKind,
    pub declared_status: Option<String>,
    pub declared_category: Option<String>,
}

impl CheckoutMetadata {
    /// Flattens the metadata into processor key/value pairs.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(KEY_TARGET_ID.to_string(), self.target_id.to_string());
        map.insert(KEY_TARGET_NAME.to_string(), self.target_name.clone());
        map.insert(KEY_CUSTOMER.to_string(), self.customer_email.to_string());
        map.insert(KEY_TYPE.to_string(), self.purchase_type.to_string());
        if let Some(status) = &self.declared_status {
            map.insert(KEY_STATUS.to_string(), status.clone());
        }
        if let Some(category) = &self.declared_category {
            map.insert(KEY_CATEGORY.to_string(), category.clone());
        }
        map
    }

    /// Reads the metadata back from a processor session.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let required = |key: &str| {
            map.get(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ValidationError::empty_field(format!("metadata.{}", key)))
        };

        Ok(Self {
            target_id: ListingId::parse(required(KEY_TARGET_ID)?.as_str())?,
            target_name: map.get(KEY_TARGET_NAME).cloned().unwrap_or_default(),
            customer_email: Email::new(required(KEY_CUSTOMER)?)?,
            purchase_type: required(KEY_TYPE)?.parse()?,
            declared_status: map.get(KEY_STATUS).cloned(),
            declared_category: map.get(KEY_CATEGORY).cloned(),
        })
    }
}
