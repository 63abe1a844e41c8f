// SPDX-License-Identifier: Apache-2.0

//! Domain model for the vecino nearby-discovery platform.

#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "vecino-model";

mod entity;
mod ids;
mod location;
mod neighborhood;

pub use entity::{EntityKind, EntityPayload, GeoEntity, AGGREGATE_KINDS};
pub use ids::{EntityId, NeighborhoodId, ParseError, UserId};
pub use location::UserLocation;
pub use neighborhood::NeighborhoodSummary;
