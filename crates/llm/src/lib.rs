//! Verdict LLM Library
//!
//! Generative-backend abstraction for the verdict pipeline: the `LlmClient`
//! trait, request/response types, and the OpenAI-compatible provider.

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
