// SPDX-License-Identifier: Apache-2.0

use crate::store::{
    AlertRecord, EntityStore, EventRecord, ListingRecord, ServicePostRecord, StoreError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use vecino_geo::{BoundingBox, Point};
use vecino_model::{NeighborhoodId, NeighborhoodSummary, UserId, UserLocation};

/// In-memory store for tests. Failure switches let tests drive the
/// systemic-failure path of individual adapters.
#[derive(Default)]
pub struct FakeStore {
    pub listings: Mutex<Vec<ListingRecord>>,
    pub alerts: Mutex<Vec<AlertRecord>>,
    pub events: Mutex<Vec<EventRecord>>,
    pub posts: Mutex<Vec<ServicePostRecord>>,
    pub locations: Mutex<HashMap<UserId, UserLocation>>,
    pub neighborhoods: Mutex<Vec<NeighborhoodSummary>>,
    pub fail_listings: AtomicBool,
    pub fail_alerts: AtomicBool,
}

#[async_trait]
impl EntityStore for FakeStore {
    async fn listings_in(
        &self,
        bbox: BoundingBox,
        category: Option<&str>,
    ) -> Result<Vec<ListingRecord>, StoreError> {
        if self.fail_listings.load(Ordering::Relaxed) {
            return Err(StoreError("listings table unavailable".to_string()));
        }
        Ok(self
            .listings
            .lock()
            .await
            .iter()
            .filter(|l| bbox.contains(l.location))
            .filter(|l| match category {
                Some(wanted) => l.category.as_deref() == Some(wanted),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn alerts_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<AlertRecord>, StoreError> {
        if self.fail_alerts.load(Ordering::Relaxed) {
            return Err(StoreError("alerts table unavailable".to_string()));
        }
        Ok(self
            .alerts
            .lock()
            .await
            .iter()
            .filter(|a| bbox.contains(a.location))
            .filter(|a| a.expires_at.map_or(true, |at| at > now))
            .cloned()
            .collect())
    }

    async fn events_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<EventRecord>, StoreError> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| bbox.contains(e.location))
            .filter(|e| e.starts_at > now)
            .cloned()
            .collect())
    }

    async fn service_posts(&self) -> Result<Vec<ServicePostRecord>, StoreError> {
        Ok(self.posts.lock().await.clone())
    }

    async fn user_location(&self, user: &UserId) -> Result<Option<UserLocation>, StoreError> {
        Ok(self.locations.lock().await.get(user).cloned())
    }

    async fn neighborhood_center(
        &self,
        id: &NeighborhoodId,
    ) -> Result<Option<Point>, StoreError> {
        Ok(self
            .neighborhoods
            .lock()
            .await
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.center))
    }

    async fn neighborhoods_in(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<NeighborhoodSummary>, StoreError> {
        Ok(self
            .neighborhoods
            .lock()
            .await
            .iter()
            .filter(|n| bbox.contains(n.center))
            .cloned()
            .collect())
    }

    async fn upsert_user_location(&self, location: UserLocation) -> Result<(), StoreError> {
        self.locations
            .lock()
            .await
            .insert(location.user_id.clone(), location);
        Ok(())
    }
}
