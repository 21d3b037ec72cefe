//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Token verification settings (JWKS-signed ID tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://securetoken.google.com/<project>`
    pub issuer: String,

    /// Expected `aud` claim (the project id for Firebase)
    pub audience: String,

    /// Where the signing keys are published
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Requires issuer and audience; HTTPS for both URLs in production.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if !self.jwks_url.starts_with("https://") && !self.jwks_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("AUTH__JWKS_URL"));
        }

        if environment == Environment::Production {
            if !self.issuer.starts_with("https://") {
                return Err(ValidationError::HttpsRequired("AUTH__ISSUER"));
            }
            if !self.jwks_url.starts_with("https://") {
                return Err(ValidationError::HttpsRequired("AUTH__JWKS_URL"));
            }
        }

        Ok(())
    }
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
