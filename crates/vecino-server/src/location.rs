// SPDX-License-Identifier: Apache-2.0

//! Location updates: validate and overwrite the user's single current-position
//! row. No distance math here, and no read-your-own-write promise towards
//! concurrent nearby queries; position reporting is inherently eventual.

use crate::store::{EntityStore, StoreError};
use vecino_api::LocationUpdateResponse;
use vecino_geo::Point;
use vecino_model::{UserId, UserLocation};

pub async fn record_location(
    store: &dyn EntityStore,
    user_id: UserId,
    location: Point,
    now: i64,
) -> Result<LocationUpdateResponse, StoreError> {
    let row = UserLocation {
        user_id,
        location,
        verified: true,
        updated_at: now,
    };
    store.upsert_user_location(row.clone()).await?;
    Ok(LocationUpdateResponse {
        location: row.location,
        verified: row.verified,
        updated_at: row.updated_at,
    })
}
