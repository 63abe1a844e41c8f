// SPDX-License-Identifier: Apache-2.0

//! The curated points-of-interest collaborator.
//!
//! The directory does its own bounding-box and exact-distance filtering and
//! returns already-distance-annotated hits. It is the one degradable source:
//! a failed or slow call drops the `place` kind from the aggregate result
//! instead of failing the query.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use vecino_geo::Point;
use vecino_model::EntityId;

#[derive(Debug)]
pub struct PlaceError(pub String);

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for PlaceError {}

/// A point of interest as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceHit {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub address: Option<String>,
    pub location: Point,
    /// Distance computed by the directory; recomputed locally before ranking
    /// since the inputs are idempotent.
    pub distance_km: f64,
}

#[async_trait]
pub trait PlaceDirectory: Send + Sync + 'static {
    async fn places_near(&self, center: Point, radius_km: f64) -> Result<Vec<PlaceHit>, PlaceError>;
}

/// HTTP client for the places collaborator.
pub struct HttpPlaceDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPlaceDirectory {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlacesWire {
    items: Vec<PlaceHit>,
}

#[async_trait]
impl PlaceDirectory for HttpPlaceDirectory {
    async fn places_near(&self, center: Point, radius_km: f64) -> Result<Vec<PlaceHit>, PlaceError> {
        let url = format!("{}/places", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", center.latitude.to_string()),
                ("longitude", center.longitude.to_string()),
                ("radius", radius_km.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PlaceError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(PlaceError(format!(
                "place directory returned {}",
                response.status()
            )));
        }
        let wire: PlacesWire = response
            .json()
            .await
            .map_err(|e| PlaceError(e.to_string()))?;
        Ok(wire.items)
    }
}

/// Used when no directory is configured; the `place` kind simply yields
/// nothing.
#[derive(Debug, Default)]
pub struct DisabledPlaceDirectory;

#[async_trait]
impl PlaceDirectory for DisabledPlaceDirectory {
    async fn places_near(
        &self,
        _center: Point,
        _radius_km: f64,
    ) -> Result<Vec<PlaceHit>, PlaceError> {
        Ok(Vec::new())
    }
}

/// Scripted directory for tests. The failure and slow-read switches drive
/// the degradation paths of the aggregator.
#[derive(Default)]
pub struct FakePlaceDirectory {
    pub hits: Mutex<Vec<PlaceHit>>,
    pub fail: AtomicBool,
    pub slow_read: AtomicBool,
    pub slow_read_delay: Mutex<Duration>,
}

#[async_trait]
impl PlaceDirectory for FakePlaceDirectory {
    async fn places_near(
        &self,
        _center: Point,
        radius_km: f64,
    ) -> Result<Vec<PlaceHit>, PlaceError> {
        if self.slow_read.load(Ordering::Relaxed) {
            let delay = *self.slow_read_delay.lock().await;
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::Relaxed) {
            return Err(PlaceError("place directory unavailable".to_string()));
        }
        Ok(self
            .hits
            .lock()
            .await
            .iter()
            .filter(|h| h.distance_km <= radius_km)
            .cloned()
            .collect())
    }
}
