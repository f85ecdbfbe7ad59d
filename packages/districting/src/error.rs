//! Typed errors for the districting library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Configuration problems
//! get their own type so callers can tell a bad invocation apart from
//! bad data or a failing collaborator.

use thiserror::Error;

/// Errors that can occur during a city pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, rejected before any processing
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// POI acquisition failed
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The persistence boundary refused the city's documents
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A spawned city worker terminated abnormally
    #[error("city worker terminated abnormally: {0}")]
    Worker(String),
}

/// Configuration problems, all detected before any data is touched.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Neighborhood radius must be a positive, finite number of meters
    #[error("epsilon_meters must be a positive number, got {0}")]
    InvalidEpsilon(f64),

    /// Core-point threshold must include at least the point itself
    #[error("min_points must be at least 1")]
    InvalidMinPoints,

    /// City selector must be non-empty
    #[error("city must not be empty")]
    EmptyCity,
}

/// Errors from POI acquisition adapters.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the backing file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source-specific failure
    #[error("source failure: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from district persistence adapters.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the committed batch failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a document failed
    #[error("document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport to the backend failed
    #[error("sink request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend accepted the request but rejected documents
    #[error("sink rejected {failed} of {total} documents for {city}")]
    Rejected {
        city: String,
        failed: usize,
        total: usize,
    },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;
