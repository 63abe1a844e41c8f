// SPDX-License-Identifier: Apache-2.0

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use vecino_geo::Point;

/// A user's last reported position.
///
/// One row per user, overwritten on every report (last-write-wins). This is a
/// current-position cache, not a trajectory log: no history is retained, and
/// readers may observe the previous point during a concurrent update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserLocation {
    pub user_id: UserId,
    pub location: Point,
    pub verified: bool,
    /// Unix seconds of the most recent report.
    pub updated_at: i64,
}
