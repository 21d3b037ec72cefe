//! Payment configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Payment configuration (Stripe hosted checkout)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: String,

    /// Webhook signing secret; the webhook route rejects every event without it
    #[serde(default)]
    pub stripe_webhook_secret: Option<String>,

    /// Client origin the processor redirects back to
    pub client_domain: String,

    /// ISO 4217 currency, lowercase
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Processor request timeout in seconds
    #[serde(default = "default_processor_timeout")]
    pub processor_timeout_secs: u64,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    pub fn processor_timeout(&self) -> Duration {
        Duration::from_secs(self.processor_timeout_secs)
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }

        if self.client_domain.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__CLIENT_DOMAIN"));
        }
        let https = self.client_domain.starts_with("https://");
        if !https && !self.client_domain.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("PAYMENT__CLIENT_DOMAIN"));
        }
        if environment == Environment::Production && !https {
            return Err(ValidationError::HttpsRequired("PAYMENT__CLIENT_DOMAIN"));
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        if self.processor_timeout_secs == 0 || self.processor_timeout_secs > 120 {
            return Err(ValidationError::InvalidProcessorTimeout);
        }

        Ok(())
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_processor_timeout() -> u64 {
    10
}
