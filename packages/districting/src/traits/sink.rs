//! The district persistence boundary.

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::types::district::DistrictDocument;

/// Receives one city's emitted district documents.
///
/// Commits are whole-or-nothing per city: an implementation that
/// returns an error must not leave a partial batch visible to
/// readers. Re-committing a city replaces its previous batch.
#[async_trait]
pub trait DistrictSink: Send + Sync {
    /// Commit the full document batch for `city`. An empty batch is a
    /// valid commit, it records that the city produced no districts.
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()>;

    /// Short sink name for logging.
    fn name(&self) -> &str {
        "sink"
    }
}

/// Blanket impl so `Arc<K>` can stand in wherever a sink is wanted.
#[async_trait]
impl<K: DistrictSink + ?Sized> DistrictSink for std::sync::Arc<K> {
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()> {
        (**self).commit_city(city, documents).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
