//! Domain data types for the districting library.

pub mod config;
pub mod district;
pub mod poi;
