//! PDF text extraction.
//!
//! Pages are extracted and chunked independently so every chunk carries its
//! 1-based page number. A page that yields no text still parses; a document
//! that fails to load does not.

use crate::chunker::{chunk_text, ChunkConfig};
use crate::types::ParsedDocument;
use verdict_core::{AppError, AppResult};

/// Extract per-page text from PDF bytes and chunk each page.
pub fn extract(data: &[u8], chunking: &ChunkConfig) -> AppResult<ParsedDocument> {
    let document = lopdf::Document::load_mem(data)
        .map_err(|e| AppError::Parse(format!("Failed to load PDF: {}", e)))?;

    let mut doc = ParsedDocument::default();

    for page_number in document.get_pages().keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .unwrap_or_default();

        for chunk in chunk_text(&page_text, chunking) {
            doc.chunks.push(chunk);
            doc.pages.push(Some(*page_number));
        }
    }

    tracing::debug!(
        pages = document.get_pages().len(),
        chunks = doc.chunks.len(),
        "Extracted PDF"
    );

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = extract(b"%PDF-1.7 but not really a pdf", &ChunkConfig::default());
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_empty_bytes_are_a_parse_error() {
        let result = extract(b"", &ChunkConfig::default());
        assert!(matches!(result, Err(AppError::Parse(_))));
    }
}
