//! Pipeline configuration and per-run reporting types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the spatial clustering stage.
///
/// There are no baked-in defaults: density varies too much between
/// cities for one radius to fit all, so callers must supply both
/// values explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Neighborhood radius in meters
    pub epsilon_meters: f64,
    /// Minimum neighborhood size, the point itself included, for a
    /// core point
    pub min_points: usize,
}

impl ClusterParams {
    pub fn new(epsilon_meters: f64, min_points: usize) -> Self {
        Self {
            epsilon_meters,
            min_points,
        }
    }

    /// Reject unusable tunables before any data is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon_meters.is_finite() || self.epsilon_meters <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon_meters));
        }
        if self.min_points < 1 {
            return Err(ConfigError::InvalidMinPoints);
        }
        Ok(())
    }
}

/// Per-reason drop counters from the normalization stage.
///
/// Malformed records are dropped and counted, never fatal to the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Input records seen
    pub records_in: usize,
    /// Valid POIs produced
    pub kept: usize,
    /// Records missing a latitude or longitude value entirely
    pub missing_coordinates: usize,
    /// Records whose coordinates failed to parse or fell outside
    /// WGS84 ranges
    pub invalid_coordinates: usize,
    /// Records with no city label
    pub missing_city: usize,
    /// Records belonging to a different city than the requested one
    pub other_city: usize,
    /// Exact duplicates within the city, by name and rounded location
    pub duplicates: usize,
}

impl NormalizeStats {
    /// Records dropped for data quality reasons.
    ///
    /// Other-city records are excluded: they are filtered, not broken.
    pub fn dropped(&self) -> usize {
        self.missing_coordinates + self.invalid_coordinates + self.missing_city + self.duplicates
    }
}

/// Summary of one city's pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRunReport {
    /// City that was processed
    pub city: String,
    /// Normalization counters
    pub normalize: NormalizeStats,
    /// Districts formed
    pub districts: usize,
    /// POIs left unclustered
    pub noise_pois: usize,
    /// Documents handed to the sink
    pub documents_committed: usize,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}
