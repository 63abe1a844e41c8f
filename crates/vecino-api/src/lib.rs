// SPDX-License-Identifier: Apache-2.0

//! Wire contract for the nearby API: query-parameter parsing, the error
//! envelope, and response DTOs.

#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "vecino-api";

mod errors;
pub mod params;
mod responses;

pub use errors::{ApiError, ApiErrorCode};
pub use params::{NearbyParams, PointParams};
pub use responses::{
    LocationUpdateBody, LocationUpdateResponse, NearbyNeighborhood, NearbyResponse,
    NeighborhoodsResponse,
};
