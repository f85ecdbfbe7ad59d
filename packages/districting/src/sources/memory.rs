//! In-memory POI source for testing and development.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::traits::source::PoiSource;
use crate::types::poi::RawPoi;

/// Holds raw records in memory and hands back a copy on every fetch.
///
/// Returns all records regardless of the requested city; filtering is
/// the normalizer's job.
#[derive(Default)]
pub struct MemorySource {
    records: RwLock<Vec<RawPoi>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RawPoi>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn push(&self, record: RawPoi) {
        self.records.write().unwrap().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PoiSource for MemorySource {
    async fn fetch(&self, _city: &str) -> SourceResult<Vec<RawPoi>> {
        Ok(self.records.read().unwrap().clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
