//! Embedding providers.
//!
//! One provider instance embeds both the corpus and every query: index and
//! query vectors must come from the same model and normalization or the
//! similarity scores are meaningless. The provider is chosen once, at
//! construction, from configuration.

pub mod hashed;
pub mod ollama;

use std::sync::Arc;
use verdict_core::config::EmbeddingConfig;
use verdict_core::{AppError, AppResult};

/// Trait for embedding providers.
///
/// Output vectors are L2-normalized, fixed-dimension, and deterministic for
/// a given provider instance.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "hashed", "ollama")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Embedding dimension
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts, one vector per input, same order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let texts = [text.to_string()];
        let mut vectors = self.embed_batch(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::Index("Provider returned no embedding".to_string()))
    }
}

/// Create an embedding provider from configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hashed" => Ok(Arc::new(hashed::HashedProvider::new(config.dimensions))),

        "ollama" => Ok(Arc::new(ollama::OllamaEmbedder::new(
            config.ollama_url.as_deref(),
            &config.model,
            config.dimensions,
        )?)),

        other => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: hashed, ollama",
            other
        ))),
    }
}

/// Scale a vector to unit L2 norm in place. Zero vectors stay zero.
pub(crate) fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
