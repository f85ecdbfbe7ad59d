//! In-memory district sink for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::traits::sink::DistrictSink;
use crate::types::district::DistrictDocument;

/// Keeps committed batches in memory, keyed by city.
///
/// Also records the order cities were committed in, which tests use
/// to check isolation between city runs.
#[derive(Default)]
pub struct MemorySink {
    committed: RwLock<HashMap<String, Vec<DistrictDocument>>>,
    commit_log: RwLock<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The batch committed for `city`, if any. An empty vec means the
    /// city committed zero districts, which is different from never
    /// having committed.
    pub fn documents_for(&self, city: &str) -> Option<Vec<DistrictDocument>> {
        self.committed.read().unwrap().get(city).cloned()
    }

    pub fn city_count(&self) -> usize {
        self.committed.read().unwrap().len()
    }

    pub fn document_count(&self) -> usize {
        self.committed.read().unwrap().values().map(Vec::len).sum()
    }

    pub fn commit_log(&self) -> Vec<String> {
        self.commit_log.read().unwrap().clone()
    }

    pub fn clear(&self) {
        self.committed.write().unwrap().clear();
        self.commit_log.write().unwrap().clear();
    }
}

#[async_trait]
impl DistrictSink for MemorySink {
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()> {
        self.committed
            .write()
            .unwrap()
            .insert(city.to_string(), documents.to_vec());
        self.commit_log.write().unwrap().push(city.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
