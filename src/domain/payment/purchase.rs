//! Purchase request for a club membership or event ticket.

use crate::domain::catalog::ListingKind;
use crate::domain::foundation::{Email, ListingId, Money, ValidationError};

use super::CheckoutMetadata;

/// A validated request to buy one unit of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    pub target_id: ListingId,
    pub target_name: String,
    pub target_image: Option<String>,
    pub target_description: Option<String>,
    pub unit_price: Money,
    pub customer_email: Email,
    pub purchase_type: ListingKind,
    pub declared_status: Option<String>,
    pub declared_category: Option<String>,
}

impl PurchaseRequest {
    /// Builds a purchase from raw client input.
    ///
    /// The customer email must be present and the price strictly positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target_id: &str,
        target_name: &str,
        target_image: Option<String>,
        target_description: Option<String>,
        unit_price_major: f64,
        customer_email: Option<&str>,
        purchase_type: ListingKind,
        declared_status: Option<String>,
        declared_category: Option<String>,
    ) -> Result<Self, ValidationError> {
        let customer_email = customer_email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ValidationError::empty_field("customerEmail"))?;
        let customer_email = Email::new(customer_email)?;

        let unit_price = Money::from_major(unit_price_major, "price")?;
        if !unit_price.is_positive() {
            return Err(ValidationError::not_positive("price"));
        }

        let target_name = target_name.trim();
        if target_name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            target_id: ListingId::parse(target_id)?,
            target_name: target_name.to_string(),
            target_image,
            target_description,
            unit_price,
            customer_email,
            purchase_type,
            declared_status,
            declared_category,
        })
    }

    /// Metadata to attach to the processor session.
    pub fn metadata(&self) -> CheckoutMetadata {
        CheckoutMetadata {
            target_id: self.target_id.clone(),
            target_name: self.target_name.clone(),
            customer_email: self.customer_email.clone(),
            purchase_type: self.purchase_type,
            declared_status: self.declared_status.clone(),
            declared_category: self.declared_category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(price: f64, email: Option<&str>) -> Result<PurchaseRequest, ValidationError> {
        PurchaseRequest::new(
            "club123",
            "Chess Club",
            None,
            None,
            price,
            email,
            ListingKind::Club,
            Some("approved".to_string()),
            Some("games".to_string()),
        )
    }

    #[test]
    fn converts_price_to_minor_units() {
        let request = build(20.0, Some("a@x.com")).unwrap();
        assert_eq!(request.unit_price.minor_units(), 2000);
    }

    #[test]
    fn requires_customer_email() {
        assert_eq!(
            build(20.0, None).unwrap_err(),
            ValidationError::empty_field("customerEmail")
        );
        assert_eq!(
            build(20.0, Some("  ")).unwrap_err(),
            ValidationError::empty_field("customerEmail")
        );
    }

    #[test]
    fn requires_positive_price() {
        assert_eq!(
            build(0.0, Some("a@x.com")).unwrap_err(),
            ValidationError::not_positive("price")
        );
        assert!(build(-5.0, Some("a@x.com")).is_err());
    }

    #[test]
    fn metadata_carries_identity_link() {
        let metadata = build(20.0, Some("a@x.com")).unwrap().metadata();
        assert_eq!(metadata.target_id.as_str(), "club123");
        assert_eq!(metadata.customer_email.as_str(), "a@x.com");
        assert_eq!(metadata.purchase_type, ListingKind::Club);
        assert_eq!(metadata.declared_category.as_deref(), Some("games"));
    }
}
