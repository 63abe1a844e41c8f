// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vecino_server::{
    build_router, ApiConfig, AppState, DisabledPlaceDirectory, HttpPlaceDirectory, PlaceDirectory,
    SqliteStore,
};

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn config_from_env() -> ApiConfig {
    let defaults = ApiConfig::default();
    ApiConfig {
        max_body_bytes: env_usize("VECINO_MAX_BODY_BYTES", defaults.max_body_bytes),
        place_timeout: Duration::from_millis(env_u64(
            "VECINO_PLACE_TIMEOUT_MS",
            defaults.place_timeout.as_millis() as u64,
        )),
        default_radius_km: env_f64("VECINO_DEFAULT_RADIUS_KM", defaults.default_radius_km),
        neighborhood_radius_km: env_f64(
            "VECINO_NEIGHBORHOOD_RADIUS_KM",
            defaults.neighborhood_radius_km,
        ),
        default_limit: env_usize("VECINO_DEFAULT_LIMIT", defaults.default_limit),
        max_limit: env_usize("VECINO_MAX_LIMIT", defaults.max_limit),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = env::var("VECINO_DB").unwrap_or_else(|_| "vecino.sqlite".to_string());
    let store = Arc::new(SqliteStore::open(&db_path)?);
    info!(db = %db_path, "entity store opened");

    let places: Arc<dyn PlaceDirectory> = match env::var("VECINO_PLACES_URL") {
        Ok(url) if !url.trim().is_empty() => {
            info!(url = %url, "place directory configured");
            Arc::new(HttpPlaceDirectory::new(url))
        }
        _ => {
            info!("no place directory configured; place source disabled");
            Arc::new(DisabledPlaceDirectory)
        }
    };

    let state = AppState::with_config(store, places, config_from_env());
    let bind = env::var("VECINO_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&bind).await?;
    info!(addr = %bind, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
