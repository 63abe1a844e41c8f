// SPDX-License-Identifier: Apache-2.0

//! The aggregator: single entry point for nearby queries.
//!
//! One shared bounding box, concurrent fan-out to the requested source
//! adapters, fan-in, exact great-circle filter, ascending distance sort and
//! offset/limit pagination. The `place` source degrades on failure; the four
//! core sources read the primary store, so their failures propagate.

use crate::sources::{self, Candidate};
use crate::store::StoreError;
use crate::{unix_now, AppState};
use tokio::time::timeout;
use tracing::warn;
use vecino_api::params::{NearbyParams, PointParams};
use vecino_api::{NearbyNeighborhood, NearbyResponse, NeighborhoodsResponse};
use vecino_geo::{distance_km, BoundingBox, Point};
use vecino_model::{EntityKind, EntityPayload, GeoEntity};

/// Aggregate nearby query over all requested kinds.
pub async fn nearby(state: &AppState, params: &NearbyParams) -> Result<NearbyResponse, StoreError> {
    let now = unix_now();
    let bbox = BoundingBox::around(params.center, params.radius_km);
    let wants = |kind: EntityKind| params.kinds.contains(&kind);
    let store = state.store.as_ref();

    let marketplace = async {
        if wants(EntityKind::Marketplace) {
            sources::marketplace_candidates(store, bbox, params.category.as_deref()).await
        } else {
            Ok(Vec::new())
        }
    };
    let alerts = async {
        if wants(EntityKind::Alert) {
            sources::alert_candidates(store, bbox, now).await
        } else {
            Ok(Vec::new())
        }
    };
    let events = async {
        if wants(EntityKind::Event) {
            sources::event_candidates(store, bbox, now).await
        } else {
            Ok(Vec::new())
        }
    };
    let services = async {
        if wants(EntityKind::Service) {
            sources::service_candidates(store, bbox).await
        } else {
            Ok(Vec::new())
        }
    };
    let places = async {
        if wants(EntityKind::Place) {
            fetch_places_degraded(state, params.center, params.radius_km).await
        } else {
            Vec::new()
        }
    };

    let (marketplace, alerts, events, services, places) =
        tokio::join!(marketplace, alerts, events, services, places);

    let candidates = marketplace?
        .into_iter()
        .chain(alerts?)
        .chain(events?)
        .chain(services?)
        .chain(places);
    let mut items = annotate_within(params.center, params.radius_km, candidates);
    sort_by_distance(&mut items);

    let total = items.len();
    Ok(NearbyResponse {
        items: page(items, params.offset, params.limit),
        total,
        radius: params.radius_km,
    })
}

/// Safety alerts only; urgent alerts rank before the distance order.
pub async fn alerts_nearby(
    state: &AppState,
    params: PointParams,
) -> Result<NearbyResponse, StoreError> {
    let bbox = BoundingBox::around(params.center, params.radius_km);
    let candidates =
        sources::alert_candidates(state.store.as_ref(), bbox, unix_now()).await?;
    let mut items = annotate_within(params.center, params.radius_km, candidates);
    items.sort_by(|a, b| {
        is_urgent(b)
            .cmp(&is_urgent(a))
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
    });
    let total = items.len();
    Ok(NearbyResponse {
        items,
        total,
        radius: params.radius_km,
    })
}

/// Marketplace listings only, with an optional category filter.
pub async fn marketplace_nearby(
    state: &AppState,
    params: PointParams,
    category: Option<&str>,
) -> Result<NearbyResponse, StoreError> {
    let bbox = BoundingBox::around(params.center, params.radius_km);
    let candidates =
        sources::marketplace_candidates(state.store.as_ref(), bbox, category).await?;
    let mut items = annotate_within(params.center, params.radius_km, candidates);
    sort_by_distance(&mut items);
    let total = items.len();
    Ok(NearbyResponse {
        items,
        total,
        radius: params.radius_km,
    })
}

/// Neighborhoods ranked by distance to their declared center points.
pub async fn neighborhoods_nearby(
    state: &AppState,
    params: PointParams,
) -> Result<NeighborhoodsResponse, StoreError> {
    let bbox = BoundingBox::around(params.center, params.radius_km);
    let neighborhoods = state.store.neighborhoods_in(bbox).await?;
    let mut items: Vec<NearbyNeighborhood> = neighborhoods
        .into_iter()
        .filter_map(|n| {
            let d = distance_km(params.center, n.center);
            (d <= params.radius_km).then_some(NearbyNeighborhood {
                neighborhood: n,
                distance_km: d,
            })
        })
        .collect();
    items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    let total = items.len();
    Ok(NeighborhoodsResponse {
        items,
        total,
        radius: params.radius_km,
    })
}

async fn fetch_places_degraded(state: &AppState, center: Point, radius_km: f64) -> Vec<Candidate> {
    match timeout(
        state.config.place_timeout,
        state.places.places_near(center, radius_km),
    )
    .await
    {
        Ok(Ok(hits)) => sources::place_candidates(hits),
        Ok(Err(e)) => {
            warn!(error = %e, "place directory failed; serving partial result");
            Vec::new()
        }
        Err(_) => {
            warn!("place directory timed out; serving partial result");
            Vec::new()
        }
    }
}

/// Exact-radius filter with inclusive boundary; corrects the bounding box's
/// over-inclusion at the corners.
fn annotate_within(
    center: Point,
    radius_km: f64,
    candidates: impl IntoIterator<Item = Candidate>,
) -> Vec<GeoEntity> {
    candidates
        .into_iter()
        .filter_map(|c| {
            let d = distance_km(center, c.location);
            (d <= radius_km).then(|| c.into_entity(d))
        })
        .collect()
}

/// Stable ascending sort on distance. Ties keep source insertion order; no
/// secondary key is guaranteed.
fn sort_by_distance(items: &mut [GeoEntity]) {
    items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

fn is_urgent(entity: &GeoEntity) -> bool {
    matches!(entity.payload, EntityPayload::Alert { urgent: true, .. })
}

fn page<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
