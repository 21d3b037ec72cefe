//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CLUB_SPHERE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use club_sphere::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; absent means in-memory stores
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Bearer token verification
    pub auth: AuthConfig,

    /// Stripe checkout and redirect settings
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLUB_SPHERE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `CLUB_SPHERE__SERVER__PORT=5000` -> `server.port = 5000`
    /// - `CLUB_SPHERE__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLUB_SPHERE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = self.server.environment;
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(environment)?;
        self.payment.validate(environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Configured CORS origins, falling back to the client domain.
    pub fn cors_origins(&self) -> Vec<String> {
        let origins = self.server.cors_origins_list();
        if origins.is_empty() {
            vec![self.payment.client_domain.clone()]
        } else {
            origins
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; tests touching them run one at a time.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CLUB_SPHERE__AUTH__ISSUER",
        "CLUB_SPHERE__AUTH__AUDIENCE",
        "CLUB_SPHERE__PAYMENT__STRIPE_API_KEY",
        "CLUB_SPHERE__PAYMENT__STRIPE_WEBHOOK_SECRET",
        "CLUB_SPHERE__PAYMENT__CLIENT_DOMAIN",
        "CLUB_SPHERE__DATABASE__URL",
        "CLUB_SPHERE__SERVER__PORT",
        "CLUB_SPHERE__SERVER__ENVIRONMENT",
        "CLUB_SPHERE__SERVER__CORS_ORIGINS",
    ];

    fn set_minimal_env() {
        env::set_var(
            "CLUB_SPHERE__AUTH__ISSUER",
            "https://securetoken.google.com/club-sphere",
        );
        env::set_var("CLUB_SPHERE__AUTH__AUDIENCE", "club-sphere");
        env::set_var("CLUB_SPHERE__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("CLUB_SPHERE__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("CLUB_SPHERE__PAYMENT__CLIENT_DOMAIN", "https://clubsphere.app");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.currency, "usd");
        assert_eq!(config.auth.audience, "club-sphere");
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn database_section_is_read_when_present() {
        let config = load_with(&[(
            "CLUB_SPHERE__DATABASE__URL",
            "postgresql://club@localhost/club_sphere",
        )])
        .unwrap();

        let database = config.database.unwrap();
        assert_eq!(database.url, "postgresql://club@localhost/club_sphere");
        assert_eq!(database.max_connections, 10);
    }

    #[test]
    fn server_overrides_apply() {
        let config = load_with(&[
            ("CLUB_SPHERE__SERVER__PORT", "3000"),
            ("CLUB_SPHERE__SERVER__ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cors_defaults_to_client_domain() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.cors_origins(), vec!["https://clubsphere.app"]);

        let config = load_with(&[(
            "CLUB_SPHERE__SERVER__CORS_ORIGINS",
            "http://localhost:5173,https://admin.clubsphere.app",
        )])
        .unwrap();
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn missing_payment_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("CLUB_SPHERE__AUTH__ISSUER", "https://securetoken.google.com/x");
        env::set_var("CLUB_SPHERE__AUTH__AUDIENCE", "x");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
