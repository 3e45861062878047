//! Retrieval type definitions.

use serde::{Deserialize, Serialize};

/// A bounded substring of document text, the unit of retrieval.
///
/// Immutable once created; owned by the vector index for the lifetime of one
/// pipeline run. The sequence index is implicit in list position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,

    /// 1-based page number, present only for paginated formats (PDF)
    pub page: Option<u32>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

/// One scored chunk returned from a similarity search.
///
/// Scores follow the cosine convention: the dot product of normalized
/// vectors, roughly in [-1, 1], higher meaning more similar. Backends using
/// other metrics convert before returning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Chunk text
    pub text: String,

    /// 1-based page number, when known
    pub page: Option<u32>,

    /// Similarity score, descending across a result list
    pub score: f32,
}

/// A parsed document: aligned chunk and page arrays.
///
/// `chunks.len() == pages.len()` always; position `i` of one describes
/// position `i` of the other.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub chunks: Vec<String>,
    pub pages: Vec<Option<u32>>,
}

impl ParsedDocument {
    /// Build from unpaginated chunks (pages all `None`).
    pub fn unpaginated(chunks: Vec<String>) -> Self {
        let pages = vec![None; chunks.len()];
        Self { chunks, pages }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Consume into aligned `Chunk` values.
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
            .into_iter()
            .zip(self.pages)
            .map(|(text, page)| Chunk::new(text, page))
            .collect()
    }
}
