//! Nearest-neighbor store over cosine distance.
//!
//! The alternate local backend. Neighbors come back ordered by distance, so
//! scores are converted with `similarity = 1 - distance` and the list is
//! re-sorted descending before returning. Neighbor order by itself is not
//! the similarity contract callers rely on.

use super::{dot, sort_by_score, IndexEntry, VectorStore};
use crate::types::RetrievalResult;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use verdict_core::AppResult;

/// k-NN candidate ordered by cosine distance (smaller is nearer).
struct Candidate {
    index: usize,
    distance: f32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on distance: the root is the worst candidate kept so far.
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// In-memory k-NN search with distance-to-similarity conversion.
#[derive(Default)]
pub struct NeighborStore {
    entries: Vec<IndexEntry>,
}

impl NeighborStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VectorStore for NeighborStore {
    fn backend_name(&self) -> &'static str {
        "neighbor"
    }

    async fn upsert(&mut self, entries: &[IndexEntry]) -> AppResult<()> {
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(top_k + 1);

        for (index, entry) in self.entries.iter().enumerate() {
            let distance = 1.0 - dot(vector, &entry.vector);
            heap.push(Candidate { index, distance });
            if heap.len() > top_k {
                heap.pop();
            }
        }

        let mut results: Vec<RetrievalResult> = heap
            .into_iter()
            .map(|candidate| {
                let entry = &self.entries[candidate.index];
                RetrievalResult {
                    text: entry.text.clone(),
                    page: entry.page,
                    score: 1.0 - candidate.distance,
                }
            })
            .collect();

        sort_by_score(&mut results);
        Ok(results)
    }
}
