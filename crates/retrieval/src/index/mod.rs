//! Vector index backends and the retriever facade.
//!
//! `VectorStore` implementations are functionally equivalent to their
//! callers: vectors plus metadata go in, scored results come out, scores in
//! the cosine convention. The backend is chosen once at construction from
//! configuration; a misconfigured store fails there, never at query time.

mod flat;
mod neighbor;
mod remote;

pub use flat::FlatStore;
pub use neighbor::NeighborStore;
pub use remote::RemoteStore;

use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::types::{Chunk, RetrievalResult};
use std::sync::Arc;
use verdict_core::config::{IndexConfig, VectorBackend};
use verdict_core::{AppConfig, AppError, AppResult};

/// Items are upserted to stores in batches of at most this many.
const UPSERT_BATCH_SIZE: usize = 100;

/// One indexed chunk: id, embedding, and retrievable metadata.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub page: Option<u32>,
}

/// Trait for vector store backends.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Insert or update a batch of entries.
    async fn upsert(&mut self, entries: &[IndexEntry]) -> AppResult<()>;

    /// Return up to `top_k` entries by descending similarity to `vector`.
    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievalResult>>;
}

/// Create a vector store from configuration.
///
/// Fails fast with a configuration error when the selected backend cannot be
/// constructed (the remote store without its settings, for example).
pub fn create_store(config: &IndexConfig) -> AppResult<Box<dyn VectorStore>> {
    match config.backend {
        VectorBackend::Flat => Ok(Box::new(FlatStore::new())),
        VectorBackend::Neighbor => Ok(Box::new(NeighborStore::new())),
        VectorBackend::Remote => {
            let endpoint = config.remote_endpoint.as_deref().ok_or_else(|| {
                AppError::Config("Remote vector backend requires an endpoint".to_string())
            })?;
            let index = config.remote_index.as_deref().ok_or_else(|| {
                AppError::Config("Remote vector backend requires an index name".to_string())
            })?;
            let api_key = config.remote_api_key.as_deref().ok_or_else(|| {
                AppError::Config("Remote vector backend requires an API key".to_string())
            })?;
            Ok(Box::new(RemoteStore::new(endpoint, index, api_key)?))
        }
    }
}

/// Embedding provider plus vector store, built once per pipeline run.
///
/// The same provider instance embeds the corpus and every query. After
/// `build` completes the retriever is read-only and safe to share across
/// concurrent question tasks.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    store: Box<dyn VectorStore>,
    indexed: usize,
}

impl Retriever {
    /// Construct provider and store from configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let provider = create_provider(&config.embedding)?;
        let store = create_store(&config.index)?;

        tracing::info!(
            provider = provider.provider_name(),
            model = provider.model_name(),
            backend = store.backend_name(),
            "Created retriever"
        );

        Ok(Self {
            provider,
            store,
            indexed: 0,
        })
    }

    #[cfg(test)]
    pub fn with_parts(provider: Arc<dyn EmbeddingProvider>, store: Box<dyn VectorStore>) -> Self {
        Self {
            provider,
            store,
            indexed: 0,
        }
    }

    /// Embed all chunks and load them into the store.
    ///
    /// Upserts go out in batches of at most 100 entries and all complete
    /// before this returns, so no search can observe a half-built index.
    pub async fn build(&mut self, chunks: Vec<Chunk>) -> AppResult<()> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.provider.embed_batch(&texts).await?;

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (chunk, vector))| IndexEntry {
                id: format!("chunk-{}", i),
                vector,
                text: chunk.text,
                page: chunk.page,
            })
            .collect();

        for batch in entries.chunks(UPSERT_BATCH_SIZE) {
            self.store.upsert(batch).await?;
        }

        self.indexed = entries.len();
        tracing::info!(chunks = self.indexed, "Index built");

        Ok(())
    }

    /// Embed the query with the corpus provider and return up to `top_k`
    /// results, descending by score.
    pub async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        let vector = self.provider.embed(query).await?;
        let results = self.store.query(&vector, top_k).await?;

        tracing::debug!(
            requested = top_k,
            returned = results.len(),
            "Search complete"
        );

        Ok(results)
    }

    /// Number of chunks loaded by `build`.
    pub fn indexed_count(&self) -> usize {
        self.indexed
    }
}

/// Dot product of two equal-length vectors.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Sort results in place by descending score.
pub(crate) fn sort_by_score(results: &mut [RetrievalResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
