//! POI types: raw acquisition records and the canonical point of interest.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::geo::GeoPoint;

/// A coordinate value as acquisition delivers it.
///
/// Tabular exports frequently carry numbers as strings; both forms are
/// accepted here and resolved during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoord {
    Number(f64),
    Text(String),
}

impl RawCoord {
    /// Parse into a finite float, if possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawCoord::Number(n) if n.is_finite() => Some(*n),
            RawCoord::Number(_) => None,
            RawCoord::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl From<f64> for RawCoord {
    fn from(value: f64) -> Self {
        RawCoord::Number(value)
    }
}

/// One record as supplied by a POI source.
///
/// Nothing about it is guaranteed: names, coordinates and city may be
/// missing or malformed. The normalizer decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPoi {
    /// Display name, if the source had one
    #[serde(default)]
    pub name: Option<String>,

    /// Latitude in degrees
    #[serde(default)]
    pub latitude: Option<RawCoord>,

    /// Longitude in degrees
    #[serde(default)]
    pub longitude: Option<RawCoord>,

    /// Owning city label
    #[serde(default)]
    pub city: Option<String>,

    /// Category tags as collected
    #[serde(default)]
    pub categories: Vec<String>,
}

impl RawPoi {
    /// Convenience constructor for a fully-populated record.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, city: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            latitude: Some(RawCoord::Number(lat)),
            longitude: Some(RawCoord::Number(lon)),
            city: Some(city.into()),
            categories: Vec::new(),
        }
    }

    /// A record with coordinates and city but no display name.
    pub fn unnamed(lat: f64, lon: f64, city: impl Into<String>) -> Self {
        Self {
            name: None,
            latitude: Some(RawCoord::Number(lat)),
            longitude: Some(RawCoord::Number(lon)),
            city: Some(city.into()),
            categories: Vec::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// A validated point of interest, immutable once normalization ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Stable identifier derived from city, name and rounded location
    pub id: String,
    /// Display name; nameless POIs are retained but carry no label weight
    pub name: Option<String>,
    /// Validated coordinates
    pub location: GeoPoint,
    /// Cleaned category tags, sorted and deduplicated
    pub categories: BTreeSet<String>,
    /// Owning city
    pub city: String,
}

impl Poi {
    /// Derive the stable id for a (city, name, location) triple.
    ///
    /// Coordinates are rounded to six decimal places, the same
    /// precision the normalizer uses for duplicate detection, so two
    /// records that collapse to one duplicate also share an id.
    pub fn derive_id(city: &str, name: Option<&str>, location: &GeoPoint) -> String {
        let mut hasher = Sha256::new();
        hasher.update(city.as_bytes());
        hasher.update(b"|");
        hasher.update(name.unwrap_or("").as_bytes());
        hasher.update(b"|");
        hasher.update(format!("{:.6}|{:.6}", location.lat, location.lon).as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }
}
