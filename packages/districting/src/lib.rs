//! City-Agnostic POI Districting Library
//!
//! Turns a city's raw points of interest into labeled, geometrically
//! bounded districts: restaurant rows become Dining districts, campus
//! blocks become University districts, and so on for any city the
//! acquisition side can supply records for.
//!
//! # Design Philosophy
//!
//! **"Geometry first, labels second"**
//!
//! - Density decides membership, no fixed district count or grid
//! - Labels come from inspectable weighted rule tables, not models
//! - Identical input produces byte-identical output
//! - Noise stays noise: sparse POIs are never forced into a district
//! - Library handles the pipeline, adapters handle I/O
//!
//! # Usage
//!
//! ```rust,ignore
//! use districting::{run_city, ClassifierRules, ClusterParams, MemorySink, MemorySource};
//!
//! let source = MemorySource::with_records(records);
//! let sink = MemorySink::new();
//! let params = ClusterParams::new(150.0, 3);
//! let rules = ClassifierRules::default();
//!
//! let report = run_city("Paris", &params, &rules, &source, &sink).await?;
//! println!("{} districts from {} POIs", report.districts, report.normalize.kept);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The two I/O boundaries (PoiSource, DistrictSink)
//! - [`types`] - POI, district and configuration types
//! - [`pipeline`] - Normalize, cluster, boundary, classify, emit
//! - [`rules`] - Weighted keyword tables for both classifiers
//! - [`geo`] - Haversine distance and polygon helpers
//! - [`sources`] - Source implementations (memory, JSON lines)
//! - [`sinks`] - Sink implementations (memory, JSON lines, Elasticsearch)

pub mod error;
pub mod geo;
pub mod pipeline;
pub mod rules;
pub mod sinks;
pub mod sources;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, PipelineError, SinkError, SourceError};
pub use traits::{sink::DistrictSink, source::PoiSource};
pub use types::{
    config::{CityRunReport, ClusterParams, NormalizeStats},
    district::{
        city_slug, AreaType, District, DistrictDocument, PolygonShape, RealEstateClass,
    },
    poi::{Poi, RawCoord, RawPoi},
};

pub use geo::GeoPoint;
pub use rules::{AreaRule, ClassRule, ClassifierRules, TagWeight};

// Re-export pipeline components
pub use pipeline::{
    // Orchestration
    build_districts, run_cities, run_city,
    // Stage functions
    boundary::extract_boundary,
    classify::{classify_area, classify_real_estate, count_categories},
    cluster::{cluster, Clustering},
    emit::to_document,
    normalize::normalize,
};

// Re-export source and sink implementations
pub use sinks::{JsonlSink, MemorySink};
pub use sources::{JsonlSource, MemorySource};

#[cfg(feature = "elastic")]
pub use sinks::ElasticSink;
