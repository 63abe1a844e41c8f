// SPDX-License-Identifier: Apache-2.0

use crate::ids::{EntityId, NeighborhoodId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use vecino_geo::Point;

/// Discriminator for every geotagged entity kind the platform knows about.
///
/// `Job` exists in the lattice but is not wired into the aggregate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Marketplace,
    Service,
    Alert,
    Event,
    Job,
    Place,
}

/// The kinds the aggregate nearby query fans out to by default.
pub const AGGREGATE_KINDS: [EntityKind; 5] = [
    EntityKind::Marketplace,
    EntityKind::Alert,
    EntityKind::Event,
    EntityKind::Service,
    EntityKind::Place,
];

impl EntityKind {
    /// Lenient token parse: unknown tokens yield `None` and are ignored by
    /// callers rather than rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "marketplace" => Some(Self::Marketplace),
            "service" => Some(Self::Service),
            "alert" => Some(Self::Alert),
            "event" => Some(Self::Event),
            "job" => Some(Self::Job),
            "place" => Some(Self::Place),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marketplace => "marketplace",
            Self::Service => "service",
            Self::Alert => "alert",
            Self::Event => "event",
            Self::Job => "job",
            Self::Place => "place",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload carried through the aggregator unchanged.
///
/// A sum type, never a free-form blob: the aggregator stays generic over the
/// envelope while callers still get structured fields per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityPayload {
    Marketplace {
        price_cents: Option<i64>,
        is_free: bool,
        category: Option<String>,
        condition: Option<String>,
        images: Vec<String>,
        author_id: UserId,
        neighborhood_id: Option<NeighborhoodId>,
    },
    Alert {
        alert_type: String,
        urgent: bool,
        verified: bool,
    },
    Event {
        category: Option<String>,
        starts_at: i64,
        ends_at: Option<i64>,
        rsvp_count: u64,
    },
    Service {
        category: Option<String>,
        author_id: UserId,
        contact: Option<String>,
    },
    Place {
        category: String,
        address: Option<String>,
    },
}

impl EntityPayload {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Marketplace { .. } => EntityKind::Marketplace,
            Self::Alert { .. } => EntityKind::Alert,
            Self::Event { .. } => EntityKind::Event,
            Self::Service { .. } => EntityKind::Service,
            Self::Place { .. } => EntityKind::Place,
        }
    }
}

/// The unified, kind-tagged, distance-annotated result record.
///
/// `distance_km` is computed against one specific query's center point and is
/// only meaningful within that query's response; it is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub title: String,
    pub description: String,
    pub location: Point,
    pub distance_km: f64,
    pub payload: EntityPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tokens_round_trip() {
        for kind in AGGREGATE_KINDS {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("job"), Some(EntityKind::Job));
    }

    #[test]
    fn unknown_kind_tokens_are_none() {
        assert_eq!(EntityKind::parse("garage-sale"), None);
        assert_eq!(EntityKind::parse(""), None);
        assert_eq!(EntityKind::parse("Marketplace"), None);
    }

    #[test]
    fn payload_kind_matches_variant() {
        let payload = EntityPayload::Alert {
            alert_type: "theft".to_string(),
            urgent: true,
            verified: false,
        };
        assert_eq!(payload.kind(), EntityKind::Alert);
    }

    #[test]
    fn entity_serializes_with_kind_tag_and_flat_payload() {
        let entity = GeoEntity {
            id: EntityId::parse("a1").expect("id"),
            kind: EntityKind::Alert,
            title: "Road closed".to_string(),
            description: "Flooding on the bridge".to_string(),
            location: Point::new(-1.2921, 36.8219).expect("point"),
            distance_km: 0.42,
            payload: EntityPayload::Alert {
                alert_type: "hazard".to_string(),
                urgent: true,
                verified: true,
            },
        };
        let value = serde_json::to_value(&entity).expect("serialize");
        assert_eq!(value["kind"], "alert");
        assert_eq!(value["payload"]["urgent"], true);
        assert_eq!(value["location"]["latitude"], -1.2921);
    }
}
