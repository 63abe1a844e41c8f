// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;
use vecino_geo::Point;
use vecino_model::{
    EntityId, NeighborhoodId, NeighborhoodSummary, UserId, AGGREGATE_KINDS,
};
use vecino_server::{
    AlertRecord, AppState, EventRecord, FakePlaceDirectory, FakeStore, ListingRecord, PlaceHit,
    ServicePostRecord,
};

/// Nairobi CBD, the fixture center used throughout.
pub const CENTER: (f64, f64) = (-1.2921, 36.8219);

pub fn point(lat: f64, lon: f64) -> Point {
    Point::new(lat, lon).expect("valid fixture point")
}

pub fn center() -> Point {
    point(CENTER.0, CENTER.1)
}

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::parse(raw).expect("valid entity id")
}

pub fn user_id(raw: &str) -> UserId {
    UserId::parse(raw).expect("valid user id")
}

pub fn neighborhood_id(raw: &str) -> NeighborhoodId {
    NeighborhoodId::parse(raw).expect("valid neighborhood id")
}

pub fn listing(id: &str, location: Point) -> ListingRecord {
    ListingRecord {
        id: entity_id(id),
        title: format!("Listing {id}"),
        description: "A well-loved item".to_string(),
        location,
        price_cents: Some(2_500),
        is_free: false,
        category: Some("furniture".to_string()),
        condition: Some("good".to_string()),
        images: vec!["img-1.jpg".to_string()],
        author_id: user_id("seller-1"),
        neighborhood_id: None,
    }
}

pub fn alert(id: &str, location: Point, urgent: bool) -> AlertRecord {
    AlertRecord {
        id: entity_id(id),
        title: format!("Alert {id}"),
        description: "Stay aware".to_string(),
        location,
        alert_type: "safety".to_string(),
        urgent,
        verified: true,
        expires_at: None,
    }
}

pub fn event(id: &str, location: Point, starts_at: i64) -> EventRecord {
    EventRecord {
        id: entity_id(id),
        title: format!("Event {id}"),
        description: "Bring a friend".to_string(),
        location,
        category: Some("community".to_string()),
        starts_at,
        ends_at: None,
        rsvp_count: 4,
    }
}

pub fn service_post(id: &str, author: &str, neighborhood: Option<&str>) -> ServicePostRecord {
    ServicePostRecord {
        id: entity_id(id),
        title: format!("Service {id}"),
        description: "Fair rates".to_string(),
        category: Some("repairs".to_string()),
        contact: Some("call me".to_string()),
        author_id: user_id(author),
        neighborhood_id: neighborhood.map(neighborhood_id),
    }
}

pub fn neighborhood(id: &str, center: Point, members: u64, posts: u64) -> NeighborhoodSummary {
    NeighborhoodSummary {
        id: neighborhood_id(id),
        name: format!("Neighborhood {id}"),
        description: None,
        center,
        member_count: members,
        post_count: posts,
    }
}

pub fn place_hit(id: &str, location: Point, distance_km: f64) -> PlaceHit {
    PlaceHit {
        id: entity_id(id),
        name: format!("Place {id}"),
        description: "Open late".to_string(),
        category: "pharmacy".to_string(),
        address: Some("1 Main St".to_string()),
        location,
        distance_km,
    }
}

pub fn app_state(store: Arc<FakeStore>, places: Arc<FakePlaceDirectory>) -> AppState {
    AppState::new(store, places)
}

pub fn nearby_params(center: Point, radius_km: f64) -> vecino_api::NearbyParams {
    vecino_api::NearbyParams {
        center,
        radius_km,
        kinds: AGGREGATE_KINDS.to_vec(),
        category: None,
        limit: 50,
        offset: 0,
    }
}
