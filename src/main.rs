//! ClubSphere server binary.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use club_sphere::adapters::auth::{JwksConfig, JwksIdentityVerifier};
use club_sphere::adapters::http::{app, AppState, HttpOptions};
use club_sphere::adapters::memory::{
    InMemoryEntitlementRepository, InMemoryListingRepository, InMemoryMembershipRepository,
    InMemoryRoleRequestRepository, InMemoryUserRepository,
};
use club_sphere::adapters::postgres::{
    self, PostgresEntitlementRepository, PostgresListingRepository,
    PostgresMembershipRepository, PostgresRoleRequestRepository, PostgresUserRepository,
};
use club_sphere::adapters::stripe::{StripeConfig, StripeProcessorAdapter};
use club_sphere::application::handlers::payment::CheckoutSettings;
use club_sphere::config::{AppConfig, ServerConfig};
use club_sphere::ports::{
    EntitlementRepository, ListingRepository, MembershipRepository, RoleRequestRepository,
    UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let options = HttpOptions {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.cors_origins(),
    };
    let state = build_state(&config).await?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "ClubSphere listening");

    axum::serve(listener, app(state, options))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over config.
fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?;
    }
    Ok(())
}

struct Stores {
    users: Arc<dyn UserRepository>,
    role_requests: Arc<dyn RoleRequestRepository>,
    listings: Arc<dyn ListingRepository>,
    entitlements: Arc<dyn EntitlementRepository>,
    memberships: Arc<dyn MembershipRepository>,
}

async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn Error>> {
    let Some(database) = &config.database else {
        tracing::warn!("No database configured; using in-memory stores");
        return Ok(Stores {
            users: Arc::new(InMemoryUserRepository::new()),
            role_requests: Arc::new(InMemoryRoleRequestRepository::new()),
            listings: Arc::new(InMemoryListingRepository::new()),
            entitlements: Arc::new(InMemoryEntitlementRepository::new()),
            memberships: Arc::new(InMemoryMembershipRepository::new()),
        });
    };

    tracing::info!(url = %database.redacted_url(), "Connecting to PostgreSQL");
    let pool = postgres::connect(database).await?;
    if database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    Ok(Stores {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        role_requests: Arc::new(PostgresRoleRequestRepository::new(pool.clone())),
        listings: Arc::new(PostgresListingRepository::new(pool.clone())),
        entitlements: Arc::new(PostgresEntitlementRepository::new(pool.clone())),
        memberships: Arc::new(PostgresMembershipRepository::new(pool)),
    })
}

async fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn Error>> {
    let stores = build_stores(config).await?;

    let jwks = JwksConfig::new(
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwks_url.clone(),
    )
    .with_cache_duration(config.auth.jwks_cache_ttl());

    let payment = &config.payment;
    let mut stripe = StripeConfig::new(payment.stripe_api_key.clone())
        .with_timeout(payment.processor_timeout());
    if let Some(secret) = &payment.stripe_webhook_secret {
        stripe = stripe.with_webhook_secret(secret.clone());
    } else {
        tracing::warn!("No Stripe webhook secret configured; webhook deliveries will be rejected");
    }
    if payment.is_test_mode() {
        tracing::info!("Stripe running in test mode");
    }

    Ok(AppState {
        identity: Arc::new(JwksIdentityVerifier::new(jwks)?),
        users: stores.users,
        role_requests: stores.role_requests,
        listings: stores.listings,
        entitlements: stores.entitlements,
        memberships: stores.memberships,
        processor: Arc::new(StripeProcessorAdapter::new(stripe)?),
        checkout: CheckoutSettings::new(payment.client_domain.clone(), payment.currency.clone()),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
