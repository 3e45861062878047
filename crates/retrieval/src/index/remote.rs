//! Remote managed vector store.
//!
//! HTTP client for a hosted vector index. Upserts carry chunk text and page
//! as retrievable metadata so query matches come back self-contained;
//! callers batch upserts at 100 entries per request. Scores from the service
//! are already cosine similarities and pass through unchanged.

use super::{IndexEntry, VectorStore};
use crate::types::RetrievalResult;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use verdict_core::{AppError, AppResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<UpsertVector>,
    namespace: String,
}

#[derive(Debug, Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: String,
    #[serde(default)]
    page: Option<u32>,
}

/// HTTP client for the remote vector index.
pub struct RemoteStore {
    client: reqwest::Client,
    endpoint: String,
    index: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(endpoint: &str, index: &str, api_key: &str) -> AppResult<Self> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Remote vector endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index: index.to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", self.api_key.trim())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Remote store request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(AppError::Index(format!(
                "Remote store returned {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl VectorStore for RemoteStore {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn upsert(&mut self, entries: &[IndexEntry]) -> AppResult<()> {
        let request = UpsertRequest {
            vectors: entries
                .iter()
                .map(|entry| UpsertVector {
                    id: entry.id.clone(),
                    values: entry.vector.clone(),
                    metadata: json!({
                        "text": entry.text,
                        "page": entry.page,
                    }),
                })
                .collect(),
            namespace: self.index.clone(),
        };

        self.post("/vectors/upsert", &request).await?;
        tracing::debug!(count = entries.len(), "Upserted batch to remote store");

        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: &self.index,
        };

        let response: QueryResponse = self
            .post("/query", &request)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Index(format!("Bad remote store response: {}", e)))?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or(MatchMetadata {
                    text: String::new(),
                    page: None,
                });
                RetrievalResult {
                    text: metadata.text,
                    page: metadata.page,
                    score: m.score,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = RemoteStore::new("vectors.internal:6333", "policies", "key");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = RemoteStore::new("https://vectors.example.com/", "policies", "key").unwrap();
        assert_eq!(store.endpoint, "https://vectors.example.com");
    }

    #[test]
    fn test_query_response_parsing() {
        let raw = r#"{
            "matches": [
                {"id": "chunk-0", "score": 0.91, "metadata": {"text": "clause", "page": 2}},
                {"id": "chunk-1", "score": 0.45, "metadata": {"text": "other", "page": null}}
            ]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].metadata.as_ref().unwrap().page, Some(2));
        assert_eq!(parsed.matches[1].metadata.as_ref().unwrap().page, None);
    }
}
