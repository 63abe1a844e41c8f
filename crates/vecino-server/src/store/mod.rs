// SPDX-License-Identifier: Apache-2.0

//! The primary-store port consumed by the source adapters.
//!
//! Every read is a bounding-box-restricted scan over one entity table; the
//! exact radius cut happens downstream in the aggregator. The only write is
//! the single-row-per-user location upsert.

use async_trait::async_trait;
use vecino_geo::{BoundingBox, Point};
use vecino_model::{EntityId, NeighborhoodId, NeighborhoodSummary, UserId, UserLocation};

pub mod fake;
pub mod sqlite;

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StoreError {}

/// An active (unsold) marketplace listing with explicit coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub location: Point,
    pub price_cents: Option<i64>,
    pub is_free: bool,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub images: Vec<String>,
    pub author_id: UserId,
    pub neighborhood_id: Option<NeighborhoodId>,
}

/// A safety alert that has not expired.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub location: Point,
    pub alert_type: String,
    pub urgent: bool,
    pub verified: bool,
    pub expires_at: Option<i64>,
}

/// An upcoming event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub location: Point,
    pub category: Option<String>,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    pub rsvp_count: u64,
}

/// A service-kind post. Carries no coordinates of its own; the adapter
/// resolves a position through the author's live location or their
/// neighborhood's center.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePostRecord {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub contact: Option<String>,
    pub author_id: UserId,
    pub neighborhood_id: Option<NeighborhoodId>,
}

#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    async fn listings_in(
        &self,
        bbox: BoundingBox,
        category: Option<&str>,
    ) -> Result<Vec<ListingRecord>, StoreError>;

    /// Alerts inside the box whose `expires_at` is null or after `now`.
    async fn alerts_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<AlertRecord>, StoreError>;

    /// Events inside the box whose `starts_at` is after `now`.
    async fn events_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<EventRecord>, StoreError>;

    async fn service_posts(&self) -> Result<Vec<ServicePostRecord>, StoreError>;

    async fn user_location(&self, user: &UserId) -> Result<Option<UserLocation>, StoreError>;

    async fn neighborhood_center(
        &self,
        id: &NeighborhoodId,
    ) -> Result<Option<Point>, StoreError>;

    async fn neighborhoods_in(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<NeighborhoodSummary>, StoreError>;

    /// Last-write-wins overwrite of the user's single location row.
    async fn upsert_user_location(&self, location: UserLocation) -> Result<(), StoreError>;
}
