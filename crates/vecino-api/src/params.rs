// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use std::collections::BTreeMap;
use vecino_geo::Point;
use vecino_model::{EntityKind, AGGREGATE_KINDS};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const NEIGHBORHOOD_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

/// Parsed and validated parameters for the aggregate nearby query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyParams {
    pub center: Point,
    pub radius_km: f64,
    pub kinds: Vec<EntityKind>,
    pub category: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

/// Center point and radius shared by the kind-specific endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointParams {
    pub center: Point,
    pub radius_km: f64,
}

pub fn parse_nearby_params(query: &BTreeMap<String, String>) -> Result<NearbyParams, ApiError> {
    parse_nearby_params_with_limit(query, DEFAULT_LIMIT, MAX_LIMIT)
}

pub fn parse_nearby_params_with_limit(
    query: &BTreeMap<String, String>,
    default_limit: usize,
    max_limit: usize,
) -> Result<NearbyParams, ApiError> {
    let PointParams { center, radius_km } = parse_point_params(query, DEFAULT_RADIUS_KM)?;

    let kinds = match query.get("types") {
        Some(raw) => parse_kinds(raw),
        None => AGGREGATE_KINDS.to_vec(),
    };

    let limit = if let Some(raw) = query.get("limit") {
        let value = raw
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param("limit", raw))?;
        if value == 0 || value > max_limit {
            return Err(ApiError::invalid_param("limit", raw));
        }
        value
    } else {
        default_limit
    };

    let offset = if let Some(raw) = query.get("offset") {
        raw.parse::<usize>()
            .map_err(|_| ApiError::invalid_param("offset", raw))?
    } else {
        0
    };

    Ok(NearbyParams {
        center,
        radius_km,
        kinds,
        category: query.get("category").cloned(),
        limit,
        offset,
    })
}

/// Parses `latitude`, `longitude` and `radius` with the given default radius.
pub fn parse_point_params(
    query: &BTreeMap<String, String>,
    default_radius_km: f64,
) -> Result<PointParams, ApiError> {
    let latitude = parse_coordinate(query, "latitude")?;
    let longitude = parse_coordinate(query, "longitude")?;
    let center = Point::new(latitude, longitude)
        .map_err(|e| ApiError::validation_failed("coordinates", &e.to_string()))?;

    let radius_km = if let Some(raw) = query.get("radius") {
        let value = raw
            .parse::<f64>()
            .map_err(|_| ApiError::invalid_param("radius", raw))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ApiError::invalid_param("radius", raw));
        }
        value
    } else {
        default_radius_km
    };

    Ok(PointParams { center, radius_km })
}

fn parse_coordinate(query: &BTreeMap<String, String>, name: &'static str) -> Result<f64, ApiError> {
    let raw = query.get(name).ok_or_else(|| ApiError::missing_param(name))?;
    raw.parse::<f64>()
        .map_err(|_| ApiError::invalid_param(name, raw))
}

/// Lenient CSV kind parsing: unknown tokens and the `job` kind (which has no
/// aggregate adapter) are skipped; duplicates collapse keeping first position.
/// A list that leaves nothing behind falls back to the full aggregate set.
fn parse_kinds(raw: &str) -> Vec<EntityKind> {
    let mut kinds = Vec::new();
    for token in raw.split(',') {
        let Some(kind) = EntityKind::parse(token.trim()) else {
            continue;
        };
        if AGGREGATE_KINDS.contains(&kind) && !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return AGGREGATE_KINDS.to_vec();
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiErrorCode;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_coordinates_given() {
        let params = parse_nearby_params(&query(&[
            ("latitude", "-1.2921"),
            ("longitude", "36.8219"),
        ]))
        .expect("params");
        assert_eq!(params.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.offset, 0);
        assert_eq!(params.kinds, AGGREGATE_KINDS.to_vec());
        assert_eq!(params.category, None);
    }

    #[test]
    fn missing_latitude_is_reported_by_name() {
        let err = parse_nearby_params(&query(&[("longitude", "36.8219")]))
            .expect_err("must fail");
        assert_eq!(err.code, ApiErrorCode::MissingQueryParameter);
        assert_eq!(err.details["parameter"], "latitude");
    }

    #[test]
    fn non_numeric_coordinate_is_invalid() {
        let err = parse_nearby_params(&query(&[
            ("latitude", "north"),
            ("longitude", "36.8219"),
        ]))
        .expect_err("must fail");
        assert_eq!(err.code, ApiErrorCode::InvalidQueryParameter);
    }

    #[test]
    fn out_of_range_latitude_fails_validation() {
        let err = parse_nearby_params(&query(&[
            ("latitude", "91.0"),
            ("longitude", "0.0"),
        ]))
        .expect_err("must fail");
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
    }

    #[test]
    fn radius_must_be_positive() {
        for bad in ["0", "-2", "NaN"] {
            let err = parse_nearby_params(&query(&[
                ("latitude", "0.0"),
                ("longitude", "0.0"),
                ("radius", bad),
            ]))
            .expect_err("must fail");
            assert_eq!(err.code, ApiErrorCode::InvalidQueryParameter);
        }
    }

    #[test]
    fn unknown_kind_tokens_are_ignored() {
        let params = parse_nearby_params(&query(&[
            ("latitude", "0.0"),
            ("longitude", "0.0"),
            ("types", "alert, garage-sale ,marketplace,alert"),
        ]))
        .expect("params");
        assert_eq!(
            params.kinds,
            vec![EntityKind::Alert, EntityKind::Marketplace]
        );
    }

    #[test]
    fn all_unknown_kinds_fall_back_to_full_set() {
        let params = parse_nearby_params(&query(&[
            ("latitude", "0.0"),
            ("longitude", "0.0"),
            ("types", "bogus,job"),
        ]))
        .expect("params");
        assert_eq!(params.kinds, AGGREGATE_KINDS.to_vec());
    }

    #[test]
    fn limit_bounds_are_enforced() {
        for bad in ["0", "201", "many"] {
            let err = parse_nearby_params(&query(&[
                ("latitude", "0.0"),
                ("longitude", "0.0"),
                ("limit", bad),
            ]))
            .expect_err("must fail");
            assert_eq!(err.code, ApiErrorCode::InvalidQueryParameter);
        }
        let params = parse_nearby_params(&query(&[
            ("latitude", "0.0"),
            ("longitude", "0.0"),
            ("limit", "200"),
            ("offset", "400"),
        ]))
        .expect("params");
        assert_eq!(params.limit, 200);
        assert_eq!(params.offset, 400);
    }
}
