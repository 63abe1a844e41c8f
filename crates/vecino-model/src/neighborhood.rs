// SPDX-License-Identifier: Apache-2.0

use crate::ids::NeighborhoodId;
use serde::{Deserialize, Serialize};
use vecino_geo::Point;

/// A neighborhood with its declared center point and aggregate counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborhoodSummary {
    pub id: NeighborhoodId,
    pub name: String,
    pub description: Option<String>,
    pub center: Point,
    pub member_count: u64,
    pub post_count: u64,
}
