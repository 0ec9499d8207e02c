use std::sync::Arc;

use actix_web::web;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod address;
mod compliance;
mod config;
mod domain;
mod messaging;
mod metrics;
mod server;
mod store;
mod utils;

use address::CanonicalAddressNormalizer;
use compliance::WatchlistOracle;
use config::{OnboardingConfig, PublisherBackend, StoreBackend};
use domain::onboarding::{CustomerStore, EventPublisher, OnboardingService, SanctionsOracle};
use messaging::{LogEventPublisher, RedpandaClient, RedpandaEventPublisher};
use server::AppState;
use store::{InMemoryCustomerStore, ScyllaCustomerStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,customer_onboarding=debug")),
        )
        .init();

    tracing::info!("🚀 Starting customer onboarding service");

    let config = OnboardingConfig::from_env()?;
    tracing::info!(
        store = ?config.store_backend,
        publisher = ?config.event_publisher,
        "Configuration loaded"
    );

    // === 1. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 2. Sanctions oracle ===
    let watchlist = match &config.watchlist_path {
        Some(path) => WatchlistOracle::load(path).await?,
        None => WatchlistOracle::empty(),
    };
    if watchlist.is_empty() {
        tracing::warn!("Sanctions watchlist is empty - no applicant will be rejected");
    }
    let sanctions: Arc<dyn SanctionsOracle> = Arc::new(watchlist);

    // === 3. Address normalizer ===
    let normalizer = Arc::new(CanonicalAddressNormalizer::new(config.address_max_len));

    // === 4. Customer store ===
    let store: Arc<dyn CustomerStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryCustomerStore::new()),
        StoreBackend::Scylla => Arc::new(
            ScyllaCustomerStore::connect(&config.scylla_uri, &config.scylla_keyspace).await?,
        ),
    };

    // === 5. Event publisher ===
    let publisher: Arc<dyn EventPublisher> = match config.event_publisher {
        PublisherBackend::Log => Arc::new(LogEventPublisher),
        PublisherBackend::Redpanda => Arc::new(RedpandaEventPublisher::new(
            RedpandaClient::new(&config.redpanda_brokers)?,
            config.event_topic_prefix.clone(),
        )),
    };

    // === 6. Orchestrator + HTTP transport ===
    let service = OnboardingService::new(sanctions, normalizer, store, publisher)
        .with_metrics(metrics.clone());

    let state = web::Data::new(AppState { service, metrics });
    let (host, port) = config.bind_address();
    server::start_server(state, host, port).await?;

    tracing::info!("👋 Onboarding service stopped");
    Ok(())
}
