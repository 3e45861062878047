//! Pipeline result types.

use serde::{Deserialize, Serialize};
use verdict_retrieval::RetrievalResult;

/// Maximum characters of chunk text carried by a citation.
pub const MAX_CITATION_CHARS: usize = 500;

/// Coverage decision for a question.
///
/// Always exactly one of three values in a final result, never absent and
/// never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "ALLOW")]
    Allow,

    #[serde(rename = "DENY")]
    Deny,

    #[serde(rename = "NEEDS_MORE_INFO")]
    NeedsMoreInfo,
}

impl Decision {
    /// Parse one of the three wire tokens. Anything else, including casing
    /// variants, is not a decision.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "ALLOW" => Some(Self::Allow),
            "DENY" => Some(Self::Deny),
            "NEEDS_MORE_INFO" => Some(Self::NeedsMoreInfo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
            Self::NeedsMoreInfo => "NEEDS_MORE_INFO",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the answer generator for one question.
///
/// `decision: None` means the generator offered no usable verdict and the
/// rule-based evaluator decides instead.
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    pub answer: String,
    pub rationale: String,
    pub decision: Option<Decision>,
}

/// A retrieved chunk attached to an answer as supporting evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based page number, when the source format has pages
    pub page: Option<u32>,

    /// Similarity score of the cited chunk
    pub score: f32,

    /// Chunk text, truncated to 500 characters
    pub text: String,
}

impl Citation {
    /// Build a citation from a retrieval result, truncating the excerpt.
    pub fn from_retrieval(result: &RetrievalResult) -> Self {
        Self {
            page: result.page,
            score: result.score,
            text: truncate_chars(&result.text, MAX_CITATION_CHARS),
        }
    }
}

/// The unit returned to the caller: one per input question, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub answer: String,
    pub rationale: String,
    pub citations: Vec<Citation>,
    pub decision: Decision,
}

/// Take the first `max_chars` characters of a string.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parse_accepts_exact_tokens() {
        assert_eq!(Decision::parse("ALLOW"), Some(Decision::Allow));
        assert_eq!(Decision::parse("DENY"), Some(Decision::Deny));
        assert_eq!(Decision::parse("NEEDS_MORE_INFO"), Some(Decision::NeedsMoreInfo));
        assert_eq!(Decision::parse("  ALLOW  "), Some(Decision::Allow));
    }

    #[test]
    fn test_decision_parse_rejects_everything_else() {
        assert_eq!(Decision::parse("allow"), None);
        assert_eq!(Decision::parse("MAYBE"), None);
        assert_eq!(Decision::parse(""), None);
    }

    #[test]
    fn test_decision_serializes_as_wire_token() {
        let json = serde_json::to_string(&Decision::NeedsMoreInfo).unwrap();
        assert_eq!(json, "\"NEEDS_MORE_INFO\"");
    }

    #[test]
    fn test_citation_truncates_to_exactly_500_chars() {
        let result = RetrievalResult {
            text: "x".repeat(800),
            page: Some(3),
            score: 0.7,
        };

        let citation = Citation::from_retrieval(&result);
        assert_eq!(citation.text.chars().count(), 500);
        assert_eq!(citation.page, Some(3));
    }

    #[test]
    fn test_citation_keeps_short_text_intact() {
        let result = RetrievalResult {
            text: "short clause".to_string(),
            page: None,
            score: 0.4,
        };

        assert_eq!(Citation::from_retrieval(&result).text, "short clause");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_characters() {
        let text = "é".repeat(600);
        let truncated = truncate_chars(&text, 500);
        assert_eq!(truncated.chars().count(), 500);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}
