//! Text chunking with fixed window size and overlap.
//!
//! A sliding window walks the text: each chunk covers `[start, start + size)`
//! clipped to the text length, and the next window starts `overlap` bytes
//! before the previous end. The final window is the one that reaches the end
//! of the text. Window edges are pulled back to `char` boundaries so chunks
//! are always valid UTF-8 substrings.

/// Chunking parameters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Window size in bytes
    pub chunk_size: usize,

    /// Bytes of overlap between consecutive windows
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            overlap: 200,
        }
    }
}

/// Split text into overlapping windows.
///
/// Every character of the input appears in at least one chunk. Empty input
/// produces no chunks; input no longer than the window produces exactly one
/// chunk equal to the whole input. Terminates for any `overlap`, including
/// `overlap >= chunk_size`: the next start is forced past the previous one.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chunk_size = config.chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let mut end = (start + chunk_size).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= start {
            // Window narrower than one character; take the character whole.
            end = start + 1;
            while end < text.len() && !text.is_char_boundary(end) {
                end += 1;
            }
        }

        chunks.push(text[start..end].to_string());

        if end == text.len() {
            break;
        }

        let mut next = end.saturating_sub(config.overlap).max(start + 1);
        while next < text.len() && !text.is_char_boundary(next) {
            next += 1;
        }
        start = next;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn test_empty_input_produces_no_chunks() {
        assert!(chunk_text("", &ChunkConfig::default()).is_empty());
    }

    #[test]
    fn test_short_input_produces_single_chunk() {
        let text = "a short policy clause";
        let chunks = chunk_text(text, &ChunkConfig::default());
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_input_exactly_window_size() {
        let text = "x".repeat(1200);
        let chunks = chunk_text(&text, &ChunkConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_every_character_is_covered() {
        let text: String = (0..5000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = chunk_text(&text, &config(1200, 200));

        let mut covered = String::new();
        for chunk in &chunks {
            // Each window starts 200 bytes before the previous end; skipping
            // the overlapping prefix reconstructs the original text.
            let skip = if covered.is_empty() { 0 } else { 200 };
            covered.push_str(&chunk[skip..]);
        }
        assert_eq!(covered, text);
    }

    #[test]
    fn test_consecutive_windows_overlap() {
        let text = "y".repeat(3000);
        let chunks = chunk_text(&text, &config(1200, 200));

        assert!(chunks.len() > 1);
        for window in chunks.windows(2) {
            let tail = &window[0][window[0].len() - 200..];
            assert!(window[1].starts_with(tail));
        }
    }

    #[test]
    fn test_terminates_when_overlap_exceeds_chunk_size() {
        let text = "z".repeat(500);
        let chunks = chunk_text(&text, &config(100, 150));

        assert!(!chunks.is_empty());
        // Forced single-byte advance still covers the whole input.
        let last = chunks.last().unwrap();
        assert!(text.ends_with(last.as_str()));
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = "q".repeat(2500);
        for chunks in [
            chunk_text(&text, &config(1200, 200)),
            chunk_text(&text, &config(100, 100)),
            chunk_text(&text, &config(7, 3)),
        ] {
            assert!(chunks.iter().all(|c| !c.is_empty()));
        }
    }

    #[test]
    fn test_multibyte_boundaries_are_respected() {
        let text = "€".repeat(500); // three bytes per char; 1000 % 3 != 0
        let chunks = chunk_text(&text, &config(1000, 100));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().all(|c| c == '€'));
        }
    }
}
