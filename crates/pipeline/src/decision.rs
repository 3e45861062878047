//! Rule-based decision evaluation.
//!
//! When the generative backend supplies a well-formed decision it is
//! authoritative and returned verbatim, without checking it against the
//! evidence. Otherwise a fixed-vocabulary scan over the answer and the
//! retrieved clauses decides, and every ambiguous combination resolves to
//! `NeedsMoreInfo` rather than guessing.

use crate::types::Decision;
use verdict_retrieval::RetrievalResult;

/// Terms that affirm coverage.
const POSITIVE_TERMS: &[&str] = &["cover", "covered", "covers", "eligible", "included", "payable"];

/// Terms that negate coverage.
const NEGATIVE_TERMS: &[&str] = &[
    "not covered",
    "excluded",
    "exclusion",
    "denied",
    "no coverage",
    "not payable",
];

/// Terms that hedge coverage behind conditions.
const CONDITION_TERMS: &[&str] = &[
    "provided that",
    "subject to",
    "only if",
    "after",
    "waiting period",
    "conditions",
];

/// Classify a question's answer and evidence into a coverage decision.
pub fn evaluate(
    _question: &str,
    answer: &str,
    retrieved: &[RetrievalResult],
    llm_decision: Option<Decision>,
) -> Decision {
    // Trust the model when it committed to one of the three values.
    if let Some(decision) = llm_decision {
        return decision;
    }

    let mut text = String::from(answer);
    for result in retrieved {
        text.push('\n');
        text.push_str(&result.text);
    }
    let text = text.to_lowercase();

    let contains_any = |terms: &[&str]| terms.iter().any(|term| text.contains(term));
    let positive = contains_any(POSITIVE_TERMS);
    let negative = contains_any(NEGATIVE_TERMS);
    let conditional = contains_any(CONDITION_TERMS);

    if positive && !negative && !conditional {
        Decision::Allow
    } else if negative && !positive {
        Decision::Deny
    } else {
        Decision::NeedsMoreInfo
    }
}
