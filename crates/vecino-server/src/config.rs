// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use vecino_api::params::{DEFAULT_LIMIT, DEFAULT_RADIUS_KM, MAX_LIMIT, NEIGHBORHOOD_RADIUS_KM};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// Budget for one place-directory call; a timeout degrades the query to
    /// the remaining sources, same as a directory error.
    pub place_timeout: Duration,
    pub default_radius_km: f64,
    pub neighborhood_radius_km: f64,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            place_timeout: Duration::from_secs(2),
            default_radius_km: DEFAULT_RADIUS_KM,
            neighborhood_radius_km: NEIGHBORHOOD_RADIUS_KM,
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}
