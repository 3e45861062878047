//! HTML text extraction.
//!
//! Parses leniently (html5ever never rejects input) and joins all text nodes
//! with single spaces, collapsing runs of whitespace.

use crate::chunker::{chunk_text, ChunkConfig};
use crate::types::ParsedDocument;
use scraper::Html;
use verdict_core::AppResult;

/// Extract the text body from HTML bytes and chunk it.
pub fn extract(data: &[u8], chunking: &ChunkConfig) -> AppResult<ParsedDocument> {
    let html = String::from_utf8_lossy(data);
    let document = Html::parse_document(&html);

    let text = document
        .root_element()
        .text()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ParsedDocument::unpaginated(chunk_text(&text, chunking)))
}
