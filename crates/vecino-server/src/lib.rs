// SPDX-License-Identifier: Apache-2.0

//! The vecino nearby-discovery service.
//!
//! One aggregate geo query fans out over five independent entity sources,
//! merges the candidates through an exact great-circle distance filter and
//! returns a single distance-ranked page. The location-update write path
//! feeds the service source with users' last reported positions.

#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub mod aggregate;
mod config;
mod http;
pub mod location;
pub mod places;
mod sources;
pub mod store;

pub use config::ApiConfig;
pub use places::{
    DisabledPlaceDirectory, FakePlaceDirectory, HttpPlaceDirectory, PlaceDirectory, PlaceError,
    PlaceHit,
};
pub use store::fake::FakeStore;
pub use store::sqlite::SqliteStore;
pub use store::{
    AlertRecord, EntityStore, EventRecord, ListingRecord, ServicePostRecord, StoreError,
};

pub const CRATE_NAME: &str = "vecino-server";

/// Shared per-request context: the primary entity store, the external place
/// directory, and the API configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub places: Arc<dyn PlaceDirectory>,
    pub config: ApiConfig,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, places: Arc<dyn PlaceDirectory>) -> Self {
        Self::with_config(store, places, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn EntityStore>,
        places: Arc<dyn PlaceDirectory>,
        config: ApiConfig,
    ) -> Self {
        Self {
            store,
            places,
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/nearby", get(http::handlers::nearby_handler))
        .route("/nearby/alerts", get(http::handlers::alerts_handler))
        .route(
            "/nearby/marketplace",
            get(http::handlers::marketplace_handler),
        )
        .route(
            "/nearby/neighborhoods",
            get(http::handlers::neighborhoods_handler),
        )
        .route(
            "/nearby/location",
            post(http::handlers::location_update_handler),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

/// Unix seconds now; zero if the clock is before the epoch.
#[must_use]
pub fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
