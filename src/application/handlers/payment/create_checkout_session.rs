//! CreateCheckoutSessionHandler - Command handler for starting a hosted checkout.

use std::sync::Arc;

use crate::application::ClubSphereError;
use crate::domain::catalog::ListingKind;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::payment::PurchaseRequest;
use crate::ports::{CheckoutSession, CheckoutSessionRequest, PaymentProcessor};

/// Placeholder the processor replaces with the session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Where the processor sends the customer back to, and in which currency we charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Client origin without a trailing slash, e.g. `https://clubsphere.app`.
    pub client_domain: String,
    pub currency: String,
}

impl CheckoutSettings {
    pub fn new(client_domain: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client_domain: client_domain.into().trim_end_matches('/').to_string(),
            currency: currency.into().to_lowercase(),
        }
    }

    pub fn success_url(&self) -> String {
        format!(
            "{}/payment-success?session_id={}",
            self.client_domain, SESSION_ID_PLACEHOLDER
        )
    }

    /// Sends a cancelled checkout back to the listing page.
    pub fn cancel_url(&self, kind: ListingKind, target_id: &str) -> String {
        format!("{}/{}s/{}", self.client_domain, kind.as_str(), target_id)
    }
}

/// Command to create a checkout session, as received from the client.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub caller: AuthenticatedUser,
    pub target_id: String,
    pub target_name: String,
    pub target_image: Option<String>,
    pub target_description: Option<String>,
    /// Price in major currency units.
    pub price: f64,
    pub customer_email: Option<String>,
    pub purchase_type: ListingKind,
    pub declared_status: Option<String>,
    pub declared_category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionResult {
    pub session: CheckoutSession,
}

/// Handler for the Checkout Session Initiator.
///
/// Validates the purchase, attaches the metadata the reconciler will need,
/// and asks the processor for a hosted session. A processor failure is
/// returned as-is; the caller resubmits.
pub struct CreateCheckoutSessionHandler {
    processor: Arc<dyn PaymentProcessor>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(processor: Arc<dyn PaymentProcessor>, settings: CheckoutSettings) -> Self {
        Self {
            processor,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, ClubSphereError> {
        // 1. Validate the purchase (email present, price positive)
        let purchase = PurchaseRequest::new(
            &cmd.target_id,
            &cmd.target_name,
            cmd.target_image,
            cmd.target_description,
            cmd.price,
            cmd.customer_email.as_deref(),
            cmd.purchase_type,
            cmd.declared_status,
            cmd.declared_category,
        )?;

        // 2. A caller may only start a checkout for themselves
        if purchase.customer_email != cmd.caller.email {
            return Err(ClubSphereError::not_permitted(
                "customerEmail must match the signed-in user",
            ));
        }

        // 3. Ask the processor for a session carrying the metadata bag
        let request = CheckoutSessionRequest {
            name: purchase.target_name.clone(),
            image: purchase.target_image.clone(),
            description: purchase.target_description.clone(),
            unit_amount_minor: purchase.unit_price.minor_units(),
            currency: self.settings.currency.clone(),
            customer_email: purchase.customer_email.to_string(),
            metadata: purchase.metadata().to_map(),
            success_url: self.settings.success_url(),
            cancel_url: self
                .settings
                .cancel_url(purchase.purchase_type, purchase.target_id.as_str()),
        };

        let session = self
            .processor
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    target_id = %purchase.target_id,
                    error = %e,
                    "Checkout session creation failed"
                );
                ClubSphereError::from(e)
            })?;

        tracing::info!(
            session_id = %session.id,
            target_id = %purchase.target_id,
            purchase_type = %purchase.purchase_type,
            "Checkout session created"
        );

        Ok(CreateCheckoutSessionResult { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProcessor;
    use crate::domain::foundation::{Email, UserId};
    use crate::ports::PaymentError;

    fn caller(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("uid-a").unwrap(),
            Email::new(email).unwrap(),
            None,
            true,
        )
    }

    fn command(price: f64, email: Option<&str>) -> CreateCheckoutSessionCommand {
        CreateCheckoutSessionCommand {
            caller: caller("a@x.com"),
            target_id: "club123".to_string(),
            target_name: "Chess Club".to_string(),
            target_image: Some("https://img/chess.png".to_string()),
            target_description: None,
            price,
            customer_email: email.map(str::to_string),
            purchase_type: ListingKind::Club,
            declared_status: Some("approved".to_string()),
            declared_category: Some("games".to_string()),
        }
    }

    fn handler(processor: Arc<MockPaymentProcessor>) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            processor,
            CheckoutSettings::new("https://clubsphere.test/", "USD"),
        )
    }

    #[tokio::test]
    async fn creates_session_with_minor_units_and_metadata() {
        let processor = Arc::new(MockPaymentProcessor::new());
        let result = handler(processor.clone())
            .handle(command(20.0, Some("a@x.com")))
            .await
            .unwrap();

        assert!(!result.session.url.is_empty());

        let requests = processor.created_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.unit_amount_minor, 2000);
        assert_eq!(request.currency, "usd");
        assert_eq!(request.customer_email, "a@x.com");
        assert_eq!(
            request.metadata.get("targetId").map(String::as_str),
            Some("club123")
        );
        assert_eq!(
            request.metadata.get("customer").map(String::as_str),
            Some("a@x.com")
        );
        assert_eq!(
            request.success_url,
            "https://clubsphere.test/payment-success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://clubsphere.test/clubs/club123");
    }

    #[tokio::test]
    async fn missing_email_is_rejected_before_processor_call() {
        let processor = Arc::new(MockPaymentProcessor::new());
        let err = handler(processor.clone())
            .handle(command(20.0, None))
            .await
            .unwrap_err();

        assert!(matches!(err, ClubSphereError::Validation { ref field, .. } if field == "customerEmail"));
        assert!(processor.created_requests().is_empty());
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() {
        let processor = Arc::new(MockPaymentProcessor::new());
        for price in [0.0, -5.0] {
            let err = handler(processor.clone())
                .handle(command(price, Some("a@x.com")))
                .await
                .unwrap_err();
            assert!(matches!(err, ClubSphereError::Validation { ref field, .. } if field == "price"));
        }
        assert!(processor.created_requests().is_empty());
    }

    #[tokio::test]
    async fn checkout_for_someone_else_is_not_permitted() {
        let processor = Arc::new(MockPaymentProcessor::new());
        let err = handler(processor.clone())
            .handle(command(20.0, Some("b@x.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, ClubSphereError::NotPermitted(_)));
        assert!(processor.created_requests().is_empty());
    }

    #[tokio::test]
    async fn processor_failure_surfaces_as_upstream_error() {
        let processor =
            Arc::new(MockPaymentProcessor::new().with_error(PaymentError::network("timeout")));
        let err = handler(processor)
            .handle(command(20.0, Some("a@x.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, ClubSphereError::UpstreamPayment { .. }));
    }

    #[test]
    fn settings_build_event_cancel_url() {
        let settings = CheckoutSettings::new("http://localhost:5173", "usd");
        assert_eq!(
            settings.cancel_url(ListingKind::Event, "e1"),
            "http://localhost:5173/events/e1"
        );
    }
}
