//! Boundary extraction: a closed polygon around each district's members.
//!
//! Rings are planar over (lon, lat), which holds at city scale away
//! from the poles and the antimeridian.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::geo::{centroid, GeoPoint, METERS_PER_DEGREE};

/// Radius floor for the circular-buffer fallback, in meters.
const MIN_BUFFER_RADIUS_M: f64 = 25.0;

/// Vertex count of the fallback polygon.
const BUFFER_VERTICES: usize = 8;

/// Margin over the furthest member when sizing the fallback. An
/// octagon's inscribed circle sits at cos(pi/8) of its circumradius,
/// so anything above 1.083 keeps every member inside.
const BUFFER_MARGIN: f64 = 1.2;

/// Compute a closed counter-clockwise boundary ring for a member set.
///
/// Uses Andrew's monotone chain over planar (lon, lat), which is
/// accurate at district scale. Member sets with fewer than three
/// distinct positions, or with all positions collinear, have no area
/// and fall back to a small circular buffer around the centroid.
pub fn extract_boundary(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let hull = convex_hull(points);
    if hull.len() >= 3 {
        let mut ring = hull;
        ring.push(ring[0]);
        return ring;
    }
    buffer_polygon(points)
}

/// Cross product of (a -> b) x (a -> c) in planar lon/lat.
fn cross(a: &GeoPoint, b: &GeoPoint, c: &GeoPoint) -> f64 {
    (b.lon - a.lon) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lon - a.lon)
}

/// Andrew's monotone chain.
///
/// Returns hull vertices counter-clockwise starting from the
/// lexicographically smallest (lon, lat), without the closing vertex.
/// Collinear points along hull edges are dropped. Fewer than three
/// distinct input positions come back as-is.
fn convex_hull(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut sorted: Vec<GeoPoint> = points.to_vec();
    sorted.sort_by(|a, b| {
        (a.lon, a.lat)
            .partial_cmp(&(b.lon, b.lat))
            .unwrap_or(Ordering::Equal)
    });
    sorted.dedup_by(|a, b| a.lon == b.lon && a.lat == b.lat);

    let n = sorted.len();
    if n < 3 {
        return sorted;
    }

    let mut hull: Vec<GeoPoint> = Vec::with_capacity(2 * n);

    // Lower hull
    for &point in &sorted {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
        {
            hull.pop();
        }
        hull.push(point);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for &point in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
        {
            hull.pop();
        }
        hull.push(point);
    }

    // Last vertex equals the first
    hull.pop();
    hull
}

/// Regular polygon approximating a circle around the member centroid.
///
/// The radius covers the furthest member with margin and has a fixed
/// floor, so even a lone POI gets an area-bearing boundary.
fn buffer_polygon(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let center = centroid(points);
    let furthest = points
        .iter()
        .map(|p| center.haversine_meters(p))
        .fold(0.0, f64::max);
    let radius_m = MIN_BUFFER_RADIUS_M.max(furthest * BUFFER_MARGIN);

    let lat_step = radius_m / METERS_PER_DEGREE;
    let cos_lat = center.lat.to_radians().cos().max(1e-3);
    let lon_step = radius_m / (METERS_PER_DEGREE * cos_lat);

    let mut ring: Vec<GeoPoint> = (0..BUFFER_VERTICES)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / BUFFER_VERTICES as f64;
            GeoPoint::new(
                center.lat + lat_step * angle.sin(),
                center.lon + lon_step * angle.cos(),
            )
        })
        .collect();
    ring.push(ring[0]);
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{ring_area_km2, ring_contains};

    /// Signed shoelace sum; positive means counter-clockwise.
    fn signed_area(ring: &[GeoPoint]) -> f64 {
        ring.windows(2)
            .map(|e| e[0].lon * e[1].lat - e[1].lon * e[0].lat)
            .sum()
    }

    #[test]
    fn test_square_with_interior_point_hulls_to_corners() {
        let members = vec![
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8600, 2.3320),
            GeoPoint::new(48.8615, 2.3320),
            GeoPoint::new(48.8615, 2.3300),
            GeoPoint::new(48.8607, 2.3310), // interior
        ];
        let ring = extract_boundary(&members);

        // Four corners plus closure
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!(!ring.contains(&GeoPoint::new(48.8607, 2.3310)));
    }

    #[test]
    fn test_ring_is_counter_clockwise_and_starts_at_min_lon() {
        let members = vec![
            GeoPoint::new(48.8610, 2.3315),
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8620, 2.3300),
            GeoPoint::new(48.8612, 2.3330),
        ];
        let ring = extract_boundary(&members);

        assert!(signed_area(&ring) > 0.0, "ring must wind counter-clockwise");
        let min_lon = members
            .iter()
            .map(|p| p.lon)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(ring[0].lon, min_lon);
    }

    #[test]
    fn test_hull_contains_every_member() {
        let members = vec![
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8603, 2.3312),
            GeoPoint::new(48.8611, 2.3308),
            GeoPoint::new(48.8598, 2.3305),
            GeoPoint::new(48.8606, 2.3296),
            GeoPoint::new(48.8604, 2.3304),
        ];
        let ring = extract_boundary(&members);
        for member in &members {
            assert!(ring_contains(&ring, member), "{member:?} escaped the hull");
        }
    }

    #[test]
    fn test_collinear_member_on_edge_stays_inside() {
        let members = vec![
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8600, 2.3310), // midpoint of the south edge
            GeoPoint::new(48.8600, 2.3320),
            GeoPoint::new(48.8610, 2.3310),
        ];
        let ring = extract_boundary(&members);

        assert_eq!(ring.len(), 4, "edge midpoint must not become a vertex");
        assert!(ring_contains(&ring, &members[1]));
    }

    #[test]
    fn test_single_member_gets_minimum_buffer() {
        let lone = vec![GeoPoint::new(48.8600, 2.3300)];
        let ring = extract_boundary(&lone);

        assert_eq!(ring.len(), BUFFER_VERTICES + 1);
        assert_eq!(ring.first(), ring.last());
        assert!(ring_contains(&ring, &lone[0]));
        assert!(ring_area_km2(&ring) > 0.0);

        // Vertices sit at the radius floor
        let center = centroid(&lone);
        for vertex in &ring[..BUFFER_VERTICES] {
            let d = center.haversine_meters(vertex);
            assert!((d - MIN_BUFFER_RADIUS_M).abs() < 1.0, "vertex at {d} m");
        }
    }

    #[test]
    fn test_two_members_get_buffer_covering_both() {
        // Roughly 60 m apart
        let pair = vec![
            GeoPoint::new(48.86000, 2.33000),
            GeoPoint::new(48.86000, 2.33082),
        ];
        let ring = extract_boundary(&pair);

        assert_eq!(ring.len(), BUFFER_VERTICES + 1);
        assert!(ring_contains(&ring, &pair[0]));
        assert!(ring_contains(&ring, &pair[1]));
        assert!(signed_area(&ring) > 0.0);
    }

    #[test]
    fn test_collinear_members_fall_back_to_buffer() {
        let line: Vec<GeoPoint> = (0..5)
            .map(|i| GeoPoint::new(48.8600, 2.3300 + i as f64 * 0.0004))
            .collect();
        let ring = extract_boundary(&line);

        assert_eq!(ring.len(), BUFFER_VERTICES + 1);
        for point in &line {
            assert!(ring_contains(&ring, point), "{point:?} outside buffer");
        }
        assert!(ring_area_km2(&ring) > 0.0);
    }

    #[test]
    fn test_duplicate_positions_collapse_before_hulling() {
        let members = vec![
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8600, 2.3300),
            GeoPoint::new(48.8600, 2.3300),
        ];
        let ring = extract_boundary(&members);

        // One distinct position: buffer, not a zero-area triangle
        assert_eq!(ring.len(), BUFFER_VERTICES + 1);
    }
}
