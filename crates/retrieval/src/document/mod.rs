//! Remote document ingestion.
//!
//! Fetches a document over HTTP (single attempt, bounded timeout) and routes
//! the bytes to a format-specific extractor. Format is decided by the
//! declared content type first, then by sniffing: the `%PDF` magic prefix and
//! URL suffixes for DOCX/HTML/EML. Anything unrecognized is decoded as text,
//! leniently; a decode never fails.

mod docx;
mod eml;
mod html;
mod pdf;

use crate::chunker::{chunk_text, ChunkConfig};
use crate::types::ParsedDocument;
use std::time::Duration;
use verdict_core::{AppError, AppResult};

/// Detected document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Html,
    Eml,
    Text,
}

impl DocumentFormat {
    /// Decide the format from the declared content type, falling back to
    /// byte sniffing and URL suffix matching.
    pub fn detect(content_type: &str, data: &[u8], url: &str) -> Self {
        let content_type = content_type.to_lowercase();
        let url = url.to_lowercase();

        if content_type.contains("pdf") || data.starts_with(b"%PDF") {
            Self::Pdf
        } else if content_type.contains("word") || url.ends_with(".docx") {
            Self::Docx
        } else if content_type.contains("html") || url.ends_with(".htm") || url.ends_with(".html") {
            Self::Html
        } else if content_type.contains("message/rfc822") || url.ends_with(".eml") {
            Self::Eml
        } else {
            Self::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Html => "html",
            Self::Eml => "eml",
            Self::Text => "text",
        }
    }
}

/// Fetch a document and extract aligned chunk/page arrays.
///
/// One attempt, no retries: an unreachable URL or non-success status is
/// surfaced immediately as `AppError::Fetch`.
pub async fn fetch_and_parse(
    url: &str,
    timeout: Duration,
    chunking: &ChunkConfig,
) -> AppResult<ParsedDocument> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Fetch(format!("Failed to fetch {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(AppError::Fetch(format!(
            "Fetching {} returned {}",
            url,
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let data = response
        .bytes()
        .await
        .map_err(|e| AppError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

    extract(&data, &content_type, url, chunking)
}

/// Route bytes to the extractor for their detected format.
pub fn extract(
    data: &[u8],
    content_type: &str,
    url: &str,
    chunking: &ChunkConfig,
) -> AppResult<ParsedDocument> {
    let format = DocumentFormat::detect(content_type, data, url);

    tracing::info!(
        format = format.as_str(),
        bytes = data.len(),
        "Extracting document"
    );

    let doc = match format {
        DocumentFormat::Pdf => pdf::extract(data, chunking)?,
        DocumentFormat::Docx => docx::extract(data, chunking)?,
        DocumentFormat::Html => html::extract(data, chunking)?,
        DocumentFormat::Eml => eml::extract(data, chunking)?,
        DocumentFormat::Text => {
            let text = String::from_utf8_lossy(data);
            ParsedDocument::unpaginated(chunk_text(&text, chunking))
        }
    };

    debug_assert_eq!(doc.chunks.len(), doc.pages.len());
    tracing::debug!(chunks = doc.chunks.len(), "Document extracted");

    Ok(doc)
}
