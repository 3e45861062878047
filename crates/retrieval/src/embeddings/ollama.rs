//! Ollama embedding provider.
//!
//! Semantic embeddings from a local Ollama server (`/api/embeddings`), one
//! request per text. A single attempt per request; the no-retry policy
//! applies here as everywhere.

use super::{normalize, EmbeddingProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verdict_core::{AppError, AppResult};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// HTTP embedding client for Ollama.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(base_url: Option<&str>, model: &str, dimensions: usize) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_OLLAMA_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
            dimensions,
        })
    }

    async fn embed_one(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(AppError::Index(format!(
                "Embedding server returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Index(format!("Bad embedding response: {}", e)))?;

        if parsed.embedding.len() != self.dimensions {
            return Err(AppError::Index(format!(
                "Model '{}' returned {} dimensions, expected {}",
                self.model,
                parsed.embedding.len(),
                self.dimensions
            )));
        }

        let mut vector = parsed.embedding;
        normalize(&mut vector);
        Ok(vector)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        // The embeddings endpoint takes one prompt at a time.
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_one(text).await?);
        }
        Ok(vectors)
    }
}
