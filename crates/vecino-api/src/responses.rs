// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use vecino_geo::Point;
use vecino_model::{GeoEntity, NeighborhoodSummary};

/// Unified page returned by the aggregate and single-kind nearby queries.
///
/// `total` counts the full filtered set for this query, not just the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NearbyResponse {
    pub items: Vec<GeoEntity>,
    pub total: usize,
    pub radius: f64,
}

/// A neighborhood annotated with the distance to its declared center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyNeighborhood {
    #[serde(flatten)]
    pub neighborhood: NeighborhoodSummary,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborhoodsResponse {
    pub items: Vec<NearbyNeighborhood>,
    pub total: usize,
    pub radius: f64,
}

/// Body of `POST /nearby/location`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationUpdateBody {
    pub latitude: f64,
    pub longitude: f64,
}

/// Echo of the stored position after a location update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationUpdateResponse {
    pub location: Point,
    pub verified: bool,
    pub updated_at: i64,
}
