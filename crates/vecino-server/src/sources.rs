// SPDX-License-Identifier: Apache-2.0

//! Source adapters: one per entity kind, each turning a storage-backed read
//! into a uniform stream of candidates restricted to a bounding box. Exact
//! distance is not known yet at this layer.

use crate::places::PlaceHit;
use crate::store::{EntityStore, ServicePostRecord, StoreError};
use vecino_geo::{BoundingBox, Point};
use vecino_model::{EntityId, EntityKind, EntityPayload, GeoEntity};

/// A kind-tagged candidate before the exact-radius check.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub id: EntityId,
    pub kind: EntityKind,
    pub title: String,
    pub description: String,
    pub location: Point,
    pub payload: EntityPayload,
}

impl Candidate {
    pub(crate) fn into_entity(self, distance_km: f64) -> GeoEntity {
        GeoEntity {
            id: self.id,
            kind: self.kind,
            title: self.title,
            description: self.description,
            location: self.location,
            distance_km,
            payload: self.payload,
        }
    }
}

pub(crate) async fn marketplace_candidates(
    store: &dyn EntityStore,
    bbox: BoundingBox,
    category: Option<&str>,
) -> Result<Vec<Candidate>, StoreError> {
    let listings = store.listings_in(bbox, category).await?;
    Ok(listings
        .into_iter()
        .map(|l| Candidate {
            id: l.id,
            kind: EntityKind::Marketplace,
            title: l.title,
            description: l.description,
            location: l.location,
            payload: EntityPayload::Marketplace {
                price_cents: l.price_cents,
                is_free: l.is_free,
                category: l.category,
                condition: l.condition,
                images: l.images,
                author_id: l.author_id,
                neighborhood_id: l.neighborhood_id,
            },
        })
        .collect())
}

pub(crate) async fn alert_candidates(
    store: &dyn EntityStore,
    bbox: BoundingBox,
    now: i64,
) -> Result<Vec<Candidate>, StoreError> {
    let alerts = store.alerts_in(bbox, now).await?;
    Ok(alerts
        .into_iter()
        .map(|a| Candidate {
            id: a.id,
            kind: EntityKind::Alert,
            title: a.title,
            description: a.description,
            location: a.location,
            payload: EntityPayload::Alert {
                alert_type: a.alert_type,
                urgent: a.urgent,
                verified: a.verified,
            },
        })
        .collect())
}

pub(crate) async fn event_candidates(
    store: &dyn EntityStore,
    bbox: BoundingBox,
    now: i64,
) -> Result<Vec<Candidate>, StoreError> {
    let events = store.events_in(bbox, now).await?;
    Ok(events
        .into_iter()
        .map(|e| Candidate {
            id: e.id,
            kind: EntityKind::Event,
            title: e.title,
            description: e.description,
            location: e.location,
            payload: EntityPayload::Event {
                category: e.category,
                starts_at: e.starts_at,
                ends_at: e.ends_at,
                rsvp_count: e.rsvp_count,
            },
        })
        .collect())
}

/// Ordered location-resolution strategies for service posts; the first one
/// yielding a point wins. Posts that resolve nowhere are skipped entirely,
/// never pinned to (0, 0).
const SERVICE_LOCATION_CHAIN: [ServiceLocationSource; 2] = [
    ServiceLocationSource::LiveLocation,
    ServiceLocationSource::NeighborhoodCenter,
];

#[derive(Debug, Clone, Copy)]
enum ServiceLocationSource {
    LiveLocation,
    NeighborhoodCenter,
}

impl ServiceLocationSource {
    async fn resolve(
        self,
        store: &dyn EntityStore,
        post: &ServicePostRecord,
    ) -> Result<Option<Point>, StoreError> {
        match self {
            Self::LiveLocation => Ok(store
                .user_location(&post.author_id)
                .await?
                .map(|l| l.location)),
            Self::NeighborhoodCenter => match &post.neighborhood_id {
                Some(id) => store.neighborhood_center(id).await,
                None => Ok(None),
            },
        }
    }
}

async fn resolve_service_location(
    store: &dyn EntityStore,
    post: &ServicePostRecord,
) -> Result<Option<Point>, StoreError> {
    for source in SERVICE_LOCATION_CHAIN {
        if let Some(point) = source.resolve(store, post).await? {
            return Ok(Some(point));
        }
    }
    Ok(None)
}

pub(crate) async fn service_candidates(
    store: &dyn EntityStore,
    bbox: BoundingBox,
) -> Result<Vec<Candidate>, StoreError> {
    let posts = store.service_posts().await?;
    let mut out = Vec::new();
    for post in posts {
        let Some(location) = resolve_service_location(store, &post).await? else {
            continue;
        };
        if !bbox.contains(location) {
            continue;
        }
        out.push(Candidate {
            id: post.id,
            kind: EntityKind::Service,
            title: post.title,
            description: post.description,
            location,
            payload: EntityPayload::Service {
                category: post.category,
                author_id: post.author_id,
                contact: post.contact,
            },
        });
    }
    Ok(out)
}

pub(crate) fn place_candidates(hits: Vec<PlaceHit>) -> Vec<Candidate> {
    hits.into_iter()
        .map(|h| Candidate {
            id: h.id,
            kind: EntityKind::Place,
            title: h.name,
            description: h.description,
            location: h.location,
            payload: EntityPayload::Place {
                category: h.category,
                address: h.address,
            },
        })
        .collect()
}
