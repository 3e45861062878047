//! LLM client factory.
//!
//! Builds a client from the generator configuration, or returns `None` when
//! no credentials are present; the caller then runs in heuristic fallback
//! mode. Missing credentials are a mode selection, not an error.

use crate::client::LlmClient;
use crate::providers::OpenAiClient;
use std::sync::Arc;
use verdict_core::config::GeneratorConfig;
use verdict_core::AppResult;

/// Create an LLM client from the generator configuration.
///
/// Returns `Ok(None)` when no API key is configured.
pub fn create_client(config: &GeneratorConfig) -> AppResult<Option<Arc<dyn LlmClient>>> {
    let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        tracing::info!("No generative backend credentials; answers will use the fallback heuristic");
        return Ok(None);
    };

    let client = match config.base_url.as_deref() {
        Some(base_url) => OpenAiClient::with_base_url(api_key, &config.model, base_url)?,
        None => OpenAiClient::new(api_key, &config.model)?,
    };

    tracing::debug!(model = %config.model, "Created generative backend client");
    Ok(Some(Arc::new(client)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_selects_fallback() {
        let config = GeneratorConfig {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: None,
        };
        assert!(create_client(&config).unwrap().is_none());
    }

    #[test]
    fn test_blank_key_selects_fallback() {
        let config = GeneratorConfig {
            api_key: Some("   ".to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
        };
        assert!(create_client(&config).unwrap().is_none());
    }

    #[test]
    fn test_key_creates_client() {
        let config = GeneratorConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url: Some("http://localhost:8080/v1".to_string()),
        };
        let client = create_client(&config).unwrap().unwrap();
        assert_eq!(client.provider_name(), "openai");
    }
}
