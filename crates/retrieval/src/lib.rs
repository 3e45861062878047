//! Verdict Retrieval Library
//!
//! Document ingestion and similarity search for the verdict pipeline:
//! - Remote document fetch and per-format text extraction
//! - Sliding-window chunking
//! - Embedding providers (local hashed, Ollama)
//! - Vector store backends (flat, neighbor, remote) behind one trait

pub mod chunker;
pub mod document;
pub mod embeddings;
pub mod index;
pub mod types;

// Re-export commonly used types
pub use chunker::{chunk_text, ChunkConfig};
pub use document::{extract, fetch_and_parse, DocumentFormat};
pub use index::Retriever;
pub use types::{Chunk, ParsedDocument, RetrievalResult};
