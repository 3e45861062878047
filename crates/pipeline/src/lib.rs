//! Verdict Pipeline Library
//!
//! The retrieval-and-decision pipeline: per-question orchestration, answer
//! generation with a heuristic fallback, and rule-based decision evaluation.

pub mod decision;
pub mod generator;
pub mod run;
pub mod types;

// Re-export commonly used types
pub use decision::evaluate;
pub use generator::AnswerGenerator;
pub use run::Pipeline;
pub use types::{Citation, Decision, GeneratedAnswer, QuestionResult};
