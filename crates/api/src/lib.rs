//! # BookSlot API
//!
//! HTTP surface of the booking engine: creating and moving bookings,
//! browsing free timeslots, guest customers, profile updates and brand
//! working hours.
//!
//! ## Architecture
//!
//! - **Routes**: URL structure, one module per resource
//! - **Handlers**: extract the request and call the [`BookingCoordinator`]
//! - **Middleware**: maps domain errors to HTTP responses
//! - **Config**: environment-driven settings
//!
//! Handlers hold no scheduling logic; everything goes through the
//! coordinator so that HTTP and in-process callers behave the same.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping
pub mod middleware;
/// Route definitions
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use bookslot_core::cache::{Cache, InMemoryCache};
use bookslot_core::coordinator::BookingCoordinator;
use bookslot_core::store::BookingStore;
use bookslot_db::{DbPool, PgStore};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(ApiState { coordinator });
/// let app = bookslot_api::app(state);
/// ```
pub struct ApiState {
    pub coordinator: BookingCoordinator,
}

/// Installs the global `tracing` subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Booking creation, updates and listing
        .merge(routes::booking::routes())
        // Slot browsing
        .merge(routes::timeslot::routes())
        // Guest customers and profile updates
        .merge(routes::customer::routes())
        // Brand working hours
        .merge(routes::brand::routes())
        .with_state(state)
}

/// Purges expired profile entries once per TTL so keys that are never read
/// again do not pile up.
fn spawn_cache_sweeper(cache: Arc<InMemoryCache>) {
    let period = cache.ttl().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            cache.purge_expired();
        }
    });
}

/// Wires the Postgres store, the optional profile cache and the coordinator,
/// then serves the API until the listener fails.
///
/// # Example
///
/// ```ignore
/// let config = ApiConfig::from_env()?;
/// let db_pool = bookslot_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let store: Arc<dyn BookingStore> = Arc::new(PgStore::new(db_pool));
    let cache: Option<Arc<dyn Cache>> = if config.cache_enabled {
        info!(ttl_seconds = config.cache_ttl, "profile cache enabled");
        let cache = Arc::new(InMemoryCache::new(Duration::from_secs(config.cache_ttl)));
        spawn_cache_sweeper(cache.clone());
        Some(cache as Arc<dyn Cache>)
    } else {
        None
    };

    let coordinator = BookingCoordinator::new(store, cache, config.coordinator_settings());
    let state = Arc::new(ApiState { coordinator });

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("binding {addr}"))?;
    info!(zone = %config.business_timezone, "Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
