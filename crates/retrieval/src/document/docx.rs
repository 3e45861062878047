//! DOCX text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml` as
//! runs of `<w:t>` text inside `<w:p>` paragraphs. Text runs are collected
//! in order with a newline per paragraph, matching how the document reads.

use crate::chunker::{chunk_text, ChunkConfig};
use crate::types::ParsedDocument;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use verdict_core::{AppError, AppResult};

/// Extract concatenated paragraph text from DOCX bytes and chunk it.
pub fn extract(data: &[u8], chunking: &ChunkConfig) -> AppResult<ParsedDocument> {
    let text = extract_text(data)?;
    Ok(ParsedDocument::unpaginated(chunk_text(&text, chunking)))
}

fn extract_text(data: &[u8]) -> AppResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| AppError::Parse(format!("Failed to open DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AppError::Parse(format!("DOCX has no document body: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Parse(format!("Failed to read DOCX body: {}", e)))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"br" => text.push('\n'),
            Ok(Event::Text(t)) if in_text_run => {
                let run = t
                    .unescape()
                    .map_err(|e| AppError::Parse(format!("Bad DOCX text run: {}", e)))?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(AppError::Parse(format!("Malformed DOCX XML: {}", e))),
        }
    }

    Ok(text.trim_end().to_string())
}
