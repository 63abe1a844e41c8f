// SPDX-License-Identifier: Apache-2.0

//! Pure geospatial math for nearby queries.
//!
//! Everything here is stateless: great-circle distance via the haversine
//! formula and derivation of the coarse latitude/longitude bounding box used
//! to prefilter candidates before the exact distance check.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "vecino-geo";

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.32;

/// Floor for the `cos(latitude)` divisor in longitude-delta derivation.
///
/// Within roughly half a degree of the poles the true divisor collapses to
/// zero and the box would become infinite or NaN. Clamping keeps the box
/// finite; queries centred that close to a pole get a box narrower than the
/// true disk, which is an accepted limitation of the coarse prefilter.
const MIN_LON_COS: f64 = 0.01;

/// A coordinate that failed range validation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum CoordinateError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    NotFinite(&'static str),
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [-180, 180]")
            }
            Self::NotFinite(name) => write!(f, "{name} must be a finite number"),
        }
    }
}

impl std::error::Error for CoordinateError {}

/// An immutable latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Validates ranges: latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() {
            return Err(CoordinateError::NotFinite("latitude"));
        }
        if !longitude.is_finite() {
            return Err(CoordinateError::NotFinite("longitude"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// An axis-aligned latitude/longitude rectangle, wrap-aware in longitude.
///
/// Used only to cut candidate volume with cheap range predicates; it is a
/// superset of the geodesic disk it is derived from, and the exact distance
/// filter downstream is what enforces the radius. A box that crosses the
/// antimeridian is stored with `min_lon > max_lon` and covers the two
/// intervals `[min_lon, 180]` and `[-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Derives the box containing the disk of `radius_km` around `center`.
    ///
    /// Longitude bounds that overshoot ±180° wrap around, producing a
    /// `min_lon > max_lon` box; a span of 180° or more per side covers all
    /// longitudes.
    #[must_use]
    pub fn around(center: Point, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lon_cos = center.latitude.to_radians().cos().max(MIN_LON_COS);
        let lon_delta = radius_km / (KM_PER_DEGREE * lon_cos);
        let (min_lon, max_lon) = if lon_delta >= 180.0 {
            (-180.0, 180.0)
        } else {
            (
                wrap_longitude(center.longitude - lon_delta),
                wrap_longitude(center.longitude + lon_delta),
            )
        };
        Self {
            min_lat: center.latitude - lat_delta,
            max_lat: center.latitude + lat_delta,
            min_lon,
            max_lon,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && self.contains_longitude(point.longitude)
    }

    #[must_use]
    pub fn contains_longitude(&self, longitude: f64) -> bool {
        if self.min_lon <= self.max_lon {
            longitude >= self.min_lon && longitude <= self.max_lon
        } else {
            longitude >= self.min_lon || longitude <= self.max_lon
        }
    }
}

/// Brings a degree value back into [-180, 180], preserving in-range inputs.
fn wrap_longitude(deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&deg) {
        return deg;
    }
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two points in kilometres.
///
/// Haversine over the mean Earth radius. Symmetric, non-negative, and zero
/// (up to floating tolerance) for identical points.
#[must_use]
pub fn distance_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).expect("valid point")
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(-1.2921, 36.8219);
        let b = point(51.5074, -0.1278);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = point(-1.2921, 36.8219);
        assert!(distance_km(a, a).abs() < 1e-9);
    }

    #[test]
    fn one_tenth_degree_of_latitude() {
        // One degree of latitude on a 6371 km sphere is ~111.195 km.
        let a = point(-1.2921, 36.8219);
        let b = point(-1.1921, 36.8219);
        assert!((distance_km(a, b) - 11.1195).abs() < 1e-3);
    }

    #[test]
    fn distance_never_negative_at_antipodes() {
        let a = point(0.0, 0.0);
        let b = point(0.0, 180.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!(d > 20_000.0);
    }

    #[test]
    fn box_contains_points_inside_the_disk() {
        let center = point(-1.2921, 36.8219);
        let radius = 5.0;
        let b = BoundingBox::around(center, radius);
        // Points placed inside the disk along both axes and a diagonal.
        let inside = [
            point(-1.2921 + 0.0440, 36.8219),
            point(-1.2921 - 0.0440, 36.8219),
            point(-1.2921, 36.8219 + 0.0440),
            point(-1.2921, 36.8219 - 0.0440),
            point(-1.2921 + 0.0310, 36.8219 + 0.0310),
        ];
        for p in inside {
            assert!(distance_km(center, p) <= radius, "fixture must be in disk");
            assert!(b.contains(p), "prefilter dropped an in-radius point");
        }
    }

    #[test]
    fn box_overshoots_the_disk_at_corners() {
        let center = point(-1.2921, 36.8219);
        let b = BoundingBox::around(center, 5.0);
        let corner = point(b.max_lat, b.max_lon);
        assert!(b.contains(corner));
        assert!(distance_km(center, corner) > 5.0);
    }

    #[test]
    fn box_wraps_across_the_antimeridian() {
        let center = point(0.0, 179.98);
        let b = BoundingBox::around(center, 5.0);
        assert!(b.min_lon > b.max_lon, "box must wrap");
        // ~4.45 km away, across the date line.
        let far_side = point(0.0, -179.98);
        assert!(distance_km(center, far_side) <= 5.0);
        assert!(b.contains(far_side));
        assert!(!b.contains(point(0.0, 179.0)));
        assert!(!b.contains(point(0.0, -179.0)));
    }

    #[test]
    fn westward_box_wraps_the_other_way() {
        let center = point(0.0, -179.98);
        let b = BoundingBox::around(center, 5.0);
        assert!(b.min_lon > b.max_lon);
        assert!(b.contains(point(0.0, 179.98)));
        assert!(b.contains(point(0.0, 180.0)));
    }

    #[test]
    fn near_polar_box_is_finite() {
        let center = point(89.99, 10.0);
        let b = BoundingBox::around(center, 5.0);
        assert!(b.min_lat.is_finite());
        assert!(b.max_lat.is_finite());
        assert!(b.min_lon.is_finite());
        assert!(b.max_lon.is_finite());
    }

    #[test]
    fn coordinate_range_is_inclusive() {
        assert!(Point::new(90.0, 180.0).is_ok());
        assert!(Point::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Point::new(90.01, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Point::new(0.0, -180.5),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            Point::new(f64::NAN, 0.0),
            Err(CoordinateError::NotFinite("latitude"))
        ));
    }
}
