//! Answer generation.
//!
//! Two modes, fixed at construction: with a generative backend, retrieved
//! clauses become a numbered context block and the backend is asked for a
//! structured JSON reply; without one, a heuristic echoes the top clause.
//! A backend failure propagates as a generation error for its question
//! only, never retried and never fatal to sibling questions.

use crate::types::{truncate_chars, Decision, GeneratedAnswer};
use serde::Deserialize;
use std::sync::Arc;
use verdict_core::AppResult;
use verdict_llm::{LlmClient, LlmRequest};
use verdict_retrieval::RetrievalResult;

const SYSTEM_PROMPT: &str = "You are an expert policy analysis assistant for insurance, legal, \
    and compliance documents. Given a user question and retrieved clauses with citations, answer \
    precisely from the text. If a clear yes/no decision is possible, state it as 'ALLOW', 'DENY', \
    or 'NEEDS_MORE_INFO'. Provide a brief rationale referencing the clauses. Keep answers concise \
    and factual.";

/// Characters of the top clause echoed by the fallback heuristic.
const FALLBACK_ANSWER_CHARS: usize = 300;

const NO_INFORMATION_ANSWER: &str = "No information found in the document for this query.";

const FALLBACK_RATIONALE: &str = "Based on the top-matching clause(s).";

const UNSTRUCTURED_RATIONALE: &str = "Model returned an unstructured reply; treated as the answer.";

/// Structured reply requested from the backend.
#[derive(Debug, Deserialize)]
struct StructuredReply {
    #[serde(default)]
    answer: String,
    #[serde(default)]
    rationale: String,
    decision: Option<String>,
}

/// Produces an answer, rationale, and proposed decision for one question.
pub struct AnswerGenerator {
    client: Option<Arc<dyn LlmClient>>,
}

impl AnswerGenerator {
    /// `client: None` selects the heuristic fallback mode.
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { client }
    }

    /// Whether a generative backend is configured.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Generate an answer for a question from its retrieved evidence.
    pub async fn generate(
        &self,
        question: &str,
        retrieved: &[RetrievalResult],
    ) -> AppResult<GeneratedAnswer> {
        let Some(client) = self.client.as_ref() else {
            return Ok(self.fallback(retrieved));
        };

        let context = format_context(retrieved);
        let prompt = format!(
            "Question: {}\n\nContext:\n{}\n\nRespond with JSON having keys: answer, rationale, \
             decision (ALLOW|DENY|NEEDS_MORE_INFO).",
            question, context
        );

        let request = LlmRequest::new(prompt)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(0.2);

        let response = client.complete(&request).await?;

        Ok(parse_reply(response.content.trim()))
    }

    /// Heuristic used when no backend is configured (and when a sibling path
    /// needs a best-effort answer after a generation failure).
    pub fn fallback(&self, retrieved: &[RetrievalResult]) -> GeneratedAnswer {
        let answer = retrieved
            .first()
            .map(|top| truncate_chars(&top.text, FALLBACK_ANSWER_CHARS))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_INFORMATION_ANSWER.to_string());

        GeneratedAnswer {
            answer,
            rationale: FALLBACK_RATIONALE.to_string(),
            decision: Some(Decision::NeedsMoreInfo),
        }
    }
}

/// Format retrieved clauses as a numbered, page-annotated context block.
fn format_context(retrieved: &[RetrievalResult]) -> String {
    retrieved
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let page = result
                .page
                .map(|p| format!(" p.{}", p))
                .unwrap_or_default();
            let text = result.text.replace('\n', " ");
            format!("[Clause {}{}] {}", i + 1, page, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the backend reply into a structured answer.
///
/// A missing `decision` key defaults to `NeedsMoreInfo`; a present but
/// malformed one becomes `None` so the rule-based evaluator decides. A reply
/// that is not JSON at all becomes the answer verbatim.
fn parse_reply(content: &str) -> GeneratedAnswer {
    let body = strip_code_fences(content);

    match serde_json::from_str::<StructuredReply>(body) {
        Ok(reply) => {
            let decision = match reply.decision {
                Some(token) => Decision::parse(&token),
                None => Some(Decision::NeedsMoreInfo),
            };
            GeneratedAnswer {
                answer: reply.answer,
                rationale: reply.rationale,
                decision,
            }
        }
        Err(_) => GeneratedAnswer {
            answer: content.to_string(),
            rationale: UNSTRUCTURED_RATIONALE.to_string(),
            decision: Some(Decision::NeedsMoreInfo),
        },
    }
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    match inner.split_once('\n') {
        Some((first_line, rest)) if !first_line.trim().contains(' ') => rest.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retrieved(texts: &[&str]) -> Vec<RetrievalResult> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| RetrievalResult {
                text: text.to_string(),
                page: if i == 0 { Some(2) } else { None },
                score: 0.9 - i as f32 * 0.1,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fallback_echoes_top_clause() {
        let generator = AnswerGenerator::new(None);
        let evidence = retrieved(&["Dental treatment is covered.", "Other clause."]);

        let answer = generator.generate("q", &evidence).await.unwrap();

        assert_eq!(answer.answer, "Dental treatment is covered.");
        assert_eq!(answer.rationale, FALLBACK_RATIONALE);
        assert_eq!(answer.decision, Some(Decision::NeedsMoreInfo));
    }

    #[tokio::test]
    async fn test_fallback_truncates_long_clause() {
        let generator = AnswerGenerator::new(None);
        let long = "c".repeat(900);
        let evidence = retrieved(&[long.as_str()]);

        let answer = generator.generate("q", &evidence).await.unwrap();
        assert_eq!(answer.answer.chars().count(), 300);
    }

    #[tokio::test]
    async fn test_fallback_without_evidence_reports_no_information() {
        let generator = AnswerGenerator::new(None);
        let answer = generator.generate("q", &[]).await.unwrap();

        assert_eq!(answer.answer, NO_INFORMATION_ANSWER);
        assert_eq!(answer.decision, Some(Decision::NeedsMoreInfo));
    }

    #[test]
    fn test_format_context_numbers_and_pages() {
        let evidence = retrieved(&["first\nclause", "second clause"]);
        let context = format_context(&evidence);

        assert_eq!(context, "[Clause 1 p.2] first clause\n[Clause 2] second clause");
    }

    #[test]
    fn test_parse_reply_structured() {
        let reply = parse_reply(
            r#"{"answer": "Yes, covered.", "rationale": "Clause 1 says so.", "decision": "ALLOW"}"#,
        );

        assert_eq!(reply.answer, "Yes, covered.");
        assert_eq!(reply.rationale, "Clause 1 says so.");
        assert_eq!(reply.decision, Some(Decision::Allow));
    }

    #[test]
    fn test_parse_reply_with_code_fence() {
        let reply = parse_reply(
            "```json\n{\"answer\": \"No.\", \"rationale\": \"r\", \"decision\": \"DENY\"}\n```",
        );

        assert_eq!(reply.answer, "No.");
        assert_eq!(reply.decision, Some(Decision::Deny));
    }

    #[test]
    fn test_parse_reply_missing_decision_defaults() {
        let reply = parse_reply(r#"{"answer": "a", "rationale": "r"}"#);
        assert_eq!(reply.decision, Some(Decision::NeedsMoreInfo));
    }

    #[test]
    fn test_parse_reply_invalid_decision_left_to_evaluator() {
        let reply = parse_reply(r#"{"answer": "a", "rationale": "r", "decision": "PROBABLY"}"#);
        assert_eq!(reply.decision, None);
    }

    #[test]
    fn test_parse_reply_unstructured_text() {
        let reply = parse_reply("The policy covers dental treatment in most cases.");

        assert_eq!(reply.answer, "The policy covers dental treatment in most cases.");
        assert_eq!(reply.rationale, UNSTRUCTURED_RATIONALE);
        assert_eq!(reply.decision, Some(Decision::NeedsMoreInfo));
    }
}
