//! Spatial clustering: density-based grouping over haversine distance.
//!
//! DBSCAN-style. A POI is a core point when at least `min_points`
//! POIs, itself included, lie within `epsilon_meters` of it. Clusters
//! grow breadth-first from core points and absorb reachable border
//! points; everything else is noise and stays unassigned. Seeds are
//! visited in input order and neighbor lists are sorted by input
//! position, so identical input always yields identical clusters.
//!
//! Input is one city's POI set: extents are assumed city-scale and
//! longitudes must not straddle the antimeridian.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::geo::{EARTH_RADIUS_M, GeoPoint, METERS_PER_DEGREE};
use crate::types::config::ClusterParams;
use crate::types::poi::Poi;

/// Result of clustering one city's POI set.
///
/// All indices refer to positions in the input slice. Clusters are in
/// discovery order; members within a cluster are in absorption order,
/// starting with the seed core point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    pub clusters: Vec<Vec<usize>>,
    pub noise: Vec<usize>,
}

impl Clustering {
    /// Total POIs assigned to any cluster.
    pub fn clustered_len(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }
}

/// Floor for grid cell edges in degrees, keeping cell indices well
/// inside i32 range even for tiny radii.
const MIN_CELL_DEG: f64 = 1e-6;

/// Grid-bucketed neighbor index over lat/lon.
///
/// Cell edges bound the lat/lon spread any two points within
/// `epsilon` of each other can have, so a radius query only has to
/// inspect the 3x3 block of cells around a point. Candidates are
/// confirmed with the haversine distance. Columns do not wrap at
/// the antimeridian.
struct GeoGrid<'a> {
    points: &'a [GeoPoint],
    cell_lat_deg: f64,
    cell_lon_deg: f64,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl<'a> GeoGrid<'a> {
    fn build(points: &'a [GeoPoint], epsilon_meters: f64) -> Self {
        let cell_lat_deg = (epsilon_meters / METERS_PER_DEGREE).max(MIN_CELL_DEG);

        // Longitude degrees shrink with latitude. Invert the haversine
        // at the widest |lat| present, so the lon edge is at least the
        // largest lon gap two points within epsilon can have. As the
        // cosine vanishes toward the poles the ratio saturates and the
        // set falls into a few 180-degree columns.
        let max_abs_lat = points.iter().map(|p| p.lat.abs()).fold(0.0, f64::max);
        let half_chord = (epsilon_meters / (2.0 * EARTH_RADIUS_M)).min(FRAC_PI_2).sin();
        let ratio = (half_chord / max_abs_lat.to_radians().cos()).min(1.0);
        let cell_lon_deg = (2.0 * ratio.asin()).to_degrees().max(MIN_CELL_DEG);

        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            let key = Self::cell_key(point, cell_lat_deg, cell_lon_deg);
            cells.entry(key).or_default().push(idx);
        }

        Self {
            points,
            cell_lat_deg,
            cell_lon_deg,
            cells,
        }
    }

    fn cell_key(point: &GeoPoint, cell_lat_deg: f64, cell_lon_deg: f64) -> (i32, i32) {
        (
            (point.lat / cell_lat_deg).floor() as i32,
            (point.lon / cell_lon_deg).floor() as i32,
        )
    }

    /// Indices of all points within `epsilon_meters` of point
    /// `center`, itself included, sorted by input position.
    fn neighbors(&self, center: usize, epsilon_meters: f64) -> Vec<usize> {
        let origin = &self.points[center];
        let (row, col) = Self::cell_key(origin, self.cell_lat_deg, self.cell_lon_deg);

        let mut found = Vec::new();
        for dr in -1..=1 {
            for dc in -1..=1 {
                let Some(bucket) = self.cells.get(&(row + dr, col + dc)) else {
                    continue;
                };
                for &idx in bucket {
                    if origin.haversine_meters(&self.points[idx]) <= epsilon_meters {
                        found.push(idx);
                    }
                }
            }
        }
        found.sort_unstable();
        found
    }
}

/// Assignment states during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// Partition one city's POIs into density-based clusters plus noise.
pub fn cluster(pois: &[Poi], params: &ClusterParams) -> Clustering {
    if pois.is_empty() {
        return Clustering {
            clusters: Vec::new(),
            noise: Vec::new(),
        };
    }
    if pois.len() < params.min_points {
        // Nothing can reach core density
        return Clustering {
            clusters: Vec::new(),
            noise: (0..pois.len()).collect(),
        };
    }

    let points: Vec<GeoPoint> = pois.iter().map(|p| p.location).collect();
    let grid = GeoGrid::build(&points, params.epsilon_meters);

    let mut labels = vec![Label::Unvisited; pois.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for seed in 0..pois.len() {
        if labels[seed] != Label::Unvisited {
            continue;
        }
        let seed_neighbors = grid.neighbors(seed, params.epsilon_meters);
        if seed_neighbors.len() < params.min_points {
            labels[seed] = Label::Noise;
            continue;
        }

        // New core point: grow a cluster breadth-first from here
        let cluster_id = clusters.len();
        let mut members = vec![seed];
        labels[seed] = Label::Cluster(cluster_id);

        let mut frontier: VecDeque<usize> = seed_neighbors.into();
        while let Some(idx) = frontier.pop_front() {
            match labels[idx] {
                Label::Cluster(_) => continue,
                Label::Noise => {
                    // Border point, reachable from a core after all.
                    // Absorbed, but never expanded.
                    labels[idx] = Label::Cluster(cluster_id);
                    members.push(idx);
                    continue;
                }
                Label::Unvisited => {}
            }

            labels[idx] = Label::Cluster(cluster_id);
            members.push(idx);

            let reach = grid.neighbors(idx, params.epsilon_meters);
            if reach.len() >= params.min_points {
                frontier.extend(reach);
            }
        }
        clusters.push(members);
    }

    let noise: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| matches!(label, Label::Noise))
        .map(|(idx, _)| idx)
        .collect();

    debug!(
        "Clustered {} POIs into {} clusters ({} noise)",
        pois.len(),
        clusters.len(),
        noise.len()
    );
    Clustering { clusters, noise }
}
