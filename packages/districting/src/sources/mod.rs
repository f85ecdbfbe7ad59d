//! POI source implementations.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlSource;
pub use memory::MemorySource;
