//! The POI acquisition boundary.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::types::poi::RawPoi;

/// Supplies raw POI records for a city.
///
/// Acquisition concerns (scrapers, files, upstream APIs) live behind
/// this trait; the pipeline only requires that whatever comes back
/// deserializes into [`RawPoi`]. Implementations are free to return
/// records for other cities too, the normalizer filters by city.
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Fetch the raw records available for `city`.
    async fn fetch(&self, city: &str) -> SourceResult<Vec<RawPoi>>;

    /// Short source name for logging.
    fn name(&self) -> &str {
        "source"
    }
}

/// Blanket impl so `Arc<S>` can stand in wherever a source is wanted.
#[async_trait]
impl<S: PoiSource + ?Sized> PoiSource for std::sync::Arc<S> {
    async fn fetch(&self, city: &str) -> SourceResult<Vec<RawPoi>> {
        (**self).fetch(city).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
