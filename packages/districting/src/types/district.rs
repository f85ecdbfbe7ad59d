//! District types: the clustering output unit and its emitted document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Area type labels.
///
/// Declaration order doubles as classification priority: when two
/// labels score equally, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaType {
    Downtown,
    University,
    Nature,
    Ethnic,
    Tourist,
    TechHub,
    Industrial,
    Dining,
    Business,
    Nightlife,
    /// No rule produced a positive score
    Other,
}

/// Real-estate class labels, same priority convention as [`AreaType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RealEstateClass {
    Upper,
    /// The fallback when no rule produces a positive score
    #[default]
    Middle,
    Lower,
}

/// A spatially coherent group of POIs with boundary and classification.
///
/// Created by the clustering stage, enriched by boundary extraction
/// and classification, terminal once emitted as a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    /// Unique within one city run: `{city-slug}-{seq}`
    pub id: String,
    /// Owning city, inherited from the members
    pub city: String,
    /// Member POI ids in cluster discovery order
    pub members: Vec<String>,
    /// Arithmetic mean of member coordinates
    pub centroid: GeoPoint,
    /// Closed counter-clockwise ring enclosing every member
    pub boundary: Vec<GeoPoint>,
    /// Dominant area label
    pub area_type: AreaType,
    /// Dominant real-estate label
    pub real_estate_class: RealEstateClass,
    /// Tag to named-member occurrence count, in first-seen order
    pub category_counts: IndexMap<String, usize>,
}

impl District {
    pub fn poi_count(&self) -> usize {
        self.members.len()
    }
}

/// GeoJSON-style polygon geometry for the emitted document.
///
/// Coordinates are `[longitude, latitude]` pairs, outer ring only,
/// closed (first vertex repeated as the last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonShape {
    /// Build from a boundary ring, enforcing closure.
    pub fn from_ring(ring: &[GeoPoint]) -> Self {
        let mut outer: Vec<[f64; 2]> = ring.iter().map(|p| [p.lon, p.lat]).collect();
        if outer.len() >= 2 && outer.first() != outer.last() {
            let first = outer[0];
            outer.push(first);
        }
        Self {
            shape_type: "Polygon".to_string(),
            coordinates: vec![outer],
        }
    }

    /// The outer ring, if present.
    pub fn outer(&self) -> Option<&[[f64; 2]]> {
        self.coordinates.first().map(Vec::as_slice)
    }
}

/// The document shape handed to sinks, one per district.
///
/// Field order is fixed so identical input renders byte-identical
/// JSON run over run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictDocument {
    pub city: String,
    pub shape: PolygonShape,
    pub area_type: AreaType,
    pub real_estate_class: RealEstateClass,
    pub poi_count: usize,
    pub category_counts: IndexMap<String, usize>,
}

/// Slug used in district ids and per-city file names.
///
/// Lowercase, with runs of non-alphanumeric characters collapsed to
/// single hyphens and trimmed from the ends.
pub fn city_slug(city: &str) -> String {
    let mut slug = String::with_capacity(city.len());
    let mut pending_hyphen = false;
    for c in city.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("city");
    }
    slug
}
