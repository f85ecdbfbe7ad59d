//! JSON-lines file source: one raw POI record per line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::error::{SourceError, SourceResult};
use crate::traits::source::PoiSource;
use crate::types::poi::RawPoi;

/// Reads acquisition output from a JSON-lines file.
///
/// Blank lines are ignored. Lines that fail to parse are skipped with
/// a warning rather than failing the fetch, matching how the
/// normalizer treats malformed fields inside a record.
pub struct JsonlSource {
    path: PathBuf,
}

impl JsonlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PoiSource for JsonlSource {
    async fn fetch(&self, _city: &str) -> SourceResult<Vec<RawPoi>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RawPoi>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!(
                        "Skipping unparseable record at {}:{}: {}",
                        self.path.display(),
                        line_no + 1,
                        e
                    );
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {} unparseable lines in {}", skipped, self.path.display());
        }
        Ok(records)
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("districting-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_parses_one_record_per_line() {
        let path = scratch_file(
            "source-ok.jsonl",
            concat!(
                r#"{"name":"Cafe Luna","latitude":48.86,"longitude":2.33,"city":"Paris","categories":["cafe"]}"#,
                "\n",
                r#"{"name":"Chez Paul","latitude":"48.8603","longitude":"2.3301","city":"Paris"}"#,
                "\n",
            ),
        );

        let source = JsonlSource::new(&path);
        let records = source.fetch("Paris").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].categories, vec!["cafe"]);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_fetch_skips_garbage_lines_and_blanks() {
        let path = scratch_file(
            "source-garbage.jsonl",
            concat!(
                r#"{"name":"Valid","latitude":48.86,"longitude":2.33,"city":"Paris"}"#,
                "\n\n",
                "not json at all\n",
                r#"{"name":"Also Valid","latitude":48.87,"longitude":2.34,"city":"Paris"}"#,
                "\n",
            ),
        );

        let source = JsonlSource::new(&path);
        let records = source.fetch("Paris").await.unwrap();

        assert_eq!(records.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_a_source_error() {
        let source = JsonlSource::new("/nonexistent/districting-test.jsonl");
        let err = source.fetch("Paris").await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
