//! Email (RFC 822 / .eml) text extraction.
//!
//! The subject line plus every text and HTML body part, joined with blank
//! lines, form the document body. Attachments are ignored.

use crate::chunker::{chunk_text, ChunkConfig};
use crate::types::ParsedDocument;
use mail_parser::MessageParser;
use verdict_core::{AppError, AppResult};

/// Extract subject and body text from raw email bytes and chunk it.
pub fn extract(data: &[u8], chunking: &ChunkConfig) -> AppResult<ParsedDocument> {
    let message = MessageParser::default()
        .parse(data)
        .ok_or_else(|| AppError::Parse("Failed to parse email message".to_string()))?;

    let mut parts: Vec<String> = Vec::new();

    if let Some(subject) = message.subject() {
        parts.push(format!("Subject: {}", subject));
    }

    for index in 0..message.text_body_count() {
        if let Some(body) = message.body_text(index) {
            if !body.trim().is_empty() {
                parts.push(body.into_owned());
            }
        }
    }

    for index in 0..message.html_body_count() {
        if let Some(body) = message.body_html(index) {
            if !body.trim().is_empty() {
                parts.push(body.into_owned());
            }
        }
    }

    let text = parts.join("\n\n");
    Ok(ParsedDocument::unpaginated(chunk_text(&text, chunking)))
}
