//! Elasticsearch-compatible bulk sink.
//!
//! Speaks the `_bulk` NDJSON protocol against any Elasticsearch-style
//! HTTP backend. The index must already exist with a `geo_shape`
//! mapping for the `shape` field; index management stays with the
//! search backend's owners.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{SinkError, SinkResult};
use crate::traits::sink::DistrictSink;
use crate::types::district::DistrictDocument;

/// Indexes each city's batch with replace semantics.
///
/// A commit first deletes the city's existing documents, then bulk
/// indexes the new batch. The backend's bulk API can apply a batch
/// partially; when that happens the partial batch is rolled back and
/// the commit reported as failed, so a failed city reads as absent
/// rather than half-written.
pub struct ElasticSink {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticSink {
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// NDJSON body for a bulk index request: action line, source line,
    /// per document.
    fn bulk_body(documents: &[DistrictDocument]) -> SinkResult<String> {
        let action = serde_json::to_string(&json!({"index": {}}))?;
        let mut body = String::new();
        for document in documents {
            body.push_str(&action);
            body.push('\n');
            body.push_str(&serde_json::to_string(document)?);
            body.push('\n');
        }
        Ok(body)
    }

    async fn delete_city(&self, city: &str) -> SinkResult<()> {
        let url = format!(
            "{}/{}/_delete_by_query?refresh=true",
            self.base_url, self.index
        );
        let query = json!({"query": {"term": {"city": city}}});

        let response = self
            .client
            .post(&url)
            .json(&query)
            .send()
            .await
            .map_err(|e| SinkError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(SinkError::Http(
                format!("delete_by_query for {city} returned {}", response.status()).into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DistrictSink for ElasticSink {
    async fn commit_city(&self, city: &str, documents: &[DistrictDocument]) -> SinkResult<()> {
        // Replace semantics: clear whatever an earlier run left
        self.delete_city(city).await?;
        if documents.is_empty() {
            debug!("No districts for {}, index left empty for the city", city);
            return Ok(());
        }

        let url = format!("{}/{}/_bulk?refresh=true", self.base_url, self.index);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(Self::bulk_body(documents)?)
            .send()
            .await
            .map_err(|e| SinkError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(SinkError::Http(
                format!("bulk request returned {}", response.status()).into(),
            ));
        }

        let result: BulkResponse = response
            .json()
            .await
            .map_err(|e| SinkError::Http(Box::new(e)))?;

        if result.errors {
            let failed = result.items.iter().filter(|item| item.failed()).count();
            // Best effort: take the partial batch back out
            if let Err(e) = self.delete_city(city).await {
                warn!("Rollback after partial bulk failed for {}: {}", city, e);
            }
            return Err(SinkError::Rejected {
                city: city.to_string(),
                failed,
                total: documents.len(),
            });
        }

        debug!("Indexed {} documents for {} into {}", documents.len(), city, self.index);
        Ok(())
    }

    fn name(&self) -> &str {
        "elastic"
    }
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(default)]
    index: Option<BulkItemStatus>,
}

#[derive(Debug, Deserialize)]
struct BulkItemStatus {
    status: u16,
}

impl BulkItem {
    fn failed(&self) -> bool {
        self.index.as_ref().map(|s| s.status >= 300).unwrap_or(true)
    }
}
