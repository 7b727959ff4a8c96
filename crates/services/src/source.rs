use std::sync::Arc;

use quiz_core::model::PaintingRecord;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::error::SourceError;
use crate::fetch::DocumentFetcher;

/// Data file locations tried in order, relative to the base URL.
pub const DEFAULT_SOURCES: &[&str] = &[
    "./paintings.json",
    "./data/paintings.json",
    "./assets/paintings.json",
    "paintings.json",
];

/// Object keys that commonly wrap the record list, in lookup order.
pub const CONTAINER_KEYS: &[&str] = &["items", "paintings", "data", "artworks", "cards"];

/// Finds the first candidate location that yields a usable list of records.
#[derive(Clone)]
pub struct ItemSourceResolver {
    fetcher: Arc<dyn DocumentFetcher>,
    base_url: Url,
    candidates: Vec<String>,
}

impl ItemSourceResolver {
    #[must_use]
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, base_url: Url, candidates: Vec<String>) -> Self {
        Self {
            fetcher,
            base_url,
            candidates,
        }
    }

    #[must_use]
    pub fn with_default_sources(fetcher: Arc<dyn DocumentFetcher>, base_url: Url) -> Self {
        let candidates = DEFAULT_SOURCES.iter().map(|s| (*s).to_owned()).collect();
        Self::new(fetcher, base_url, candidates)
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Raw records from the first candidate that yields a non-empty list.
    ///
    /// Every failure (bad URL, transport, status, malformed body, unrecognized
    /// shape) moves on to the next candidate. Returns an empty list when all
    /// candidates are exhausted.
    pub async fn resolve(&self) -> Vec<Value> {
        for candidate in &self.candidates {
            let url = match self.base_url.join(candidate) {
                Ok(url) => url,
                Err(err) => {
                    debug!(%candidate, %err, "skipping unparseable data source");
                    continue;
                }
            };

            let body = match self.fetcher.fetch_json(&url).await {
                Ok(body) => body,
                Err(err) => {
                    debug!(source = %url, %err, "data source unavailable");
                    continue;
                }
            };

            match extract_records(&body) {
                Some(records) => {
                    info!(source = %url, count = records.len(), "loaded painting records");
                    return records;
                }
                None => debug!(source = %url, "data source has no recognizable painting list"),
            }
        }

        Vec::new()
    }

    /// Resolve and normalize paintings.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::DataUnavailable` when no candidate yields records.
    pub async fn load_paintings(&self) -> Result<Vec<PaintingRecord>, SourceError> {
        let records = self.resolve().await;
        if records.is_empty() {
            return Err(SourceError::DataUnavailable {
                attempted: self.candidates.len(),
            });
        }
        Ok(records.iter().map(PaintingRecord::from_raw).collect())
    }
}

/// Pull the record list out of a parsed data file.
///
/// Precedence: a top-level list; the first non-empty list under one of
/// [`CONTAINER_KEYS`]; the first top-level list (document order) whose first
/// element looks like a painting.
#[must_use]
pub fn extract_records(body: &Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => (!items.is_empty()).then(|| items.clone()),
        Value::Object(fields) => {
            let wrapped = CONTAINER_KEYS.iter().find_map(|key| match fields.get(*key) {
                Some(Value::Array(items)) if !items.is_empty() => Some(items),
                _ => None,
            });
            wrapped
                .or_else(|| {
                    fields.values().find_map(|value| match value {
                        Value::Array(items)
                            if items.first().is_some_and(PaintingRecord::looks_like_painting) =>
                        {
                            Some(items)
                        }
                        _ => None,
                    })
                })
                .cloned()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::InMemoryFetcher;
    use serde_json::json;

    const BASE: &str = "http://quiz.local/";

    fn resolver(fetcher: &InMemoryFetcher, candidates: &[&str]) -> ItemSourceResolver {
        ItemSourceResolver::new(
            Arc::new(fetcher.clone()),
            Url::parse(BASE).unwrap(),
            candidates.iter().map(|c| (*c).to_owned()).collect(),
        )
    }

    #[test]
    fn top_level_list_is_used_directly() {
        let body = json!([{ "title": "A" }, { "title": "B" }]);
        assert_eq!(extract_records(&body).unwrap().len(), 2);
        assert!(extract_records(&json!([])).is_none());
    }

    #[test]
    fn container_keys_are_checked_in_order() {
        let body = json!({
            "cards": [{ "title": "from cards" }],
            "data": [],
            "paintings": [{ "title": "from paintings" }]
        });
        let records = extract_records(&body).unwrap();
        assert_eq!(records, vec![json!({ "title": "from paintings" })]);
    }

    #[test]
    fn falls_back_to_first_painting_shaped_list() {
        let body = json!({
            "meta": { "version": 2 },
            "tags": ["portrait", "landscape"],
            "museums": [{ "museum": "Русский музей" }],
            "works": [{ "painter": "Repin", "photo": "https://example.org/a.jpg" }],
            "more": [{ "title": "later" }]
        });
        let records = extract_records(&body).unwrap();
        assert_eq!(records[0]["painter"], "Repin");
    }

    #[test]
    fn unrecognized_shapes_yield_nothing() {
        assert!(extract_records(&json!({ "tags": ["a"], "count": 3 })).is_none());
        assert!(extract_records(&json!("paintings")).is_none());
        assert!(extract_records(&json!(null)).is_none());
    }

    #[tokio::test]
    async fn malformed_body_falls_through_to_next_candidate() {
        let fetcher = InMemoryFetcher::new()
            .with_document(&format!("{BASE}broken.json"), "{oops")
            .with_document(&format!("{BASE}good.json"), r#"[{ "title": "Bogatyrs" }]"#);
        let sources = resolver(&fetcher, &["broken.json", "good.json", "unused.json"]);

        let records = sources.resolve().await;
        assert_eq!(records, vec![json!({ "title": "Bogatyrs" })]);
        assert_eq!(
            fetcher.requests(),
            vec![format!("{BASE}broken.json"), format!("{BASE}good.json")]
        );
    }

    #[tokio::test]
    async fn exhausted_candidates_report_what_was_tried() {
        let fetcher = InMemoryFetcher::new().with_document(&format!("{BASE}empty.json"), "[]");
        let sources = resolver(&fetcher, &["empty.json", "missing.json"]);

        assert!(sources.resolve().await.is_empty());
        let err = sources.load_paintings().await.unwrap_err();
        assert!(matches!(err, SourceError::DataUnavailable { attempted: 2 }));
    }
}
