//! District sink implementations.

#[cfg(feature = "elastic")]
pub mod elastic;
pub mod jsonl;
pub mod memory;

#[cfg(feature = "elastic")]
pub use elastic::ElasticSink;
pub use jsonl::JsonlSink;
pub use memory::MemorySink;
