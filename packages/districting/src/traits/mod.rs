//! Core trait abstractions for the districting library.
//!
//! These traits define the two I/O boundaries applications implement:
//! where raw POI records come from and where finished district
//! documents go.

pub mod sink;
pub mod source;
