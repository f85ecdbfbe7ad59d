//! JSON-lines file sink: one file per committed city.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{SinkError, SinkResult};
use crate::traits::sink::DistrictSink;
use crate::types::district::{city_slug, DistrictDocument};

/// Writes each city's batch to `{dir}/{city-slug}.jsonl`.
///
/// The batch is serialized into one buffer, staged to a temp file
/// next to the target, and renamed into place, so a failed commit
/// leaves the previous file intact, never half a batch. Re-committing
/// a city replaces its file.
pub struct JsonlSink {
    dir: PathBuf,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a city's batch lands.
    pub fn file_for(&self, city: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", city_slug(city)))
    }
}

#[async_trait]
impl DistrictSink for JsonlSink {
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()> {
        let mut buffer = String::new();
        for document in documents {
            buffer.push_str(&serde_json::to_string(document)?);
            buffer.push('\n');
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::Io {
                path: self.dir.display().to_string(),
                source: e,
            })?;

        // Stage next to the target and rename into place; the target
        // keeps its previous batch until the new one is fully on disk
        let path = self.file_for(city);
        let staging = path.with_extension("jsonl.tmp");
        if let Err(e) = tokio::fs::write(&staging, buffer).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(SinkError::Io {
                path: staging.display().to_string(),
                source: e,
            });
        }
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(SinkError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }

        debug!("Wrote {} documents to {}", documents.len(), path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}
