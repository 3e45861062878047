//! Exact inner-product store.
//!
//! The primary local backend: a full scan over normalized vectors. Inner
//! product of unit vectors is cosine similarity, so scores already follow
//! the convention and need no conversion.

use super::{dot, sort_by_score, IndexEntry, VectorStore};
use crate::types::RetrievalResult;
use verdict_core::AppResult;

/// In-memory exact inner-product search.
#[derive(Default)]
pub struct FlatStore {
    entries: Vec<IndexEntry>,
}

impl FlatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VectorStore for FlatStore {
    fn backend_name(&self) -> &'static str {
        "flat"
    }

    async fn upsert(&mut self, entries: &[IndexEntry]) -> AppResult<()> {
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        let mut results: Vec<RetrievalResult> = self
            .entries
            .iter()
            .map(|entry| RetrievalResult {
                text: entry.text.clone(),
                page: entry.page,
                score: dot(vector, &entry.vector),
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(top_k);
        Ok(results)
    }
}
