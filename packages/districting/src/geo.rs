//! Geographic primitives shared across the pipeline stages.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (and of longitude at the equator),
/// on the same mean sphere as the haversine distance.
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both coordinates are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in meters.
    ///
    /// Uses the Haversine formula for accuracy on Earth's surface.
    pub fn haversine_meters(&self, other: &GeoPoint) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// Arithmetic mean of a coordinate set.
///
/// Planar averaging is accurate enough at city scale. An empty input
/// yields the origin; cluster member sets are never empty.
pub fn centroid(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.lon).sum::<f64>() / n;
    GeoPoint::new(lat, lon)
}

/// Whether `point` lies inside or on a convex counter-clockwise ring.
///
/// `ring` must be closed (first vertex repeated as the last vertex).
/// Boundary points count as inside.
pub fn ring_contains(ring: &[GeoPoint], point: &GeoPoint) -> bool {
    if ring.len() < 4 {
        return false;
    }
    ring.windows(2).all(|edge| {
        let cross = (edge[1].lon - edge[0].lon) * (point.lat - edge[0].lat)
            - (edge[1].lat - edge[0].lat) * (point.lon - edge[0].lon);
        cross >= -1e-12
    })
}

/// Rough polygon area in square kilometers.
///
/// Planar shoelace over degrees, scaled by meters-per-degree. Only
/// used for audit logging, where city-scale accuracy is sufficient.
pub fn ring_area_km2(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 4 {
        return 0.0;
    }
    let doubled: f64 = ring
        .windows(2)
        .map(|edge| edge[0].lon * edge[1].lat - edge[1].lon * edge[0].lat)
        .sum();
    let area_deg2 = 0.5 * doubled.abs();
    let km_per_degree = METERS_PER_DEGREE / 1000.0;
    area_deg2 * km_per_degree * km_per_degree
}
