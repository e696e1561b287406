//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{AskqlError, Result};
use crate::llm::gemini::DEFAULT_GEMINI_MODEL;
use crate::llm::openai::DEFAULT_OPENAI_MODEL;
use crate::llm::{
    GeminiClient, GeminiConfig, LlmClient, LlmProvider, MockLlmClient, OpenAiClient, OpenAiConfig,
};

/// Creates an LLM client for the given provider.
///
/// If `api_key` is provided, it takes precedence over environment variables.
/// Otherwise the key is read from the environment:
/// - Gemini: `GOOGLE_API_KEY`, then `GEMINI_API_KEY`
/// - OpenAI: `OPENAI_API_KEY`
///
/// The model comes from `settings.model`, else the provider default.
/// A missing key is a setup error.
pub fn create_client(
    provider: LlmProvider,
    settings: &LlmConfig,
    api_key: Option<String>,
) -> Result<Box<dyn LlmClient>> {
    let model = |default: &str| {
        settings
            .model
            .clone()
            .unwrap_or_else(|| default.to_string())
    };

    match provider {
        LlmProvider::Gemini => {
            let key = api_key
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
                .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    AskqlError::setup("GOOGLE_API_KEY not found in environment or .env file.")
                })?;
            let mut config = GeminiConfig::new(key, model(DEFAULT_GEMINI_MODEL))
                .with_timeout(settings.timeout_secs);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.clone());
            }
            Ok(Box::new(GeminiClient::new(config)?))
        }
        LlmProvider::OpenAi => {
            let key = api_key
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    AskqlError::setup("OPENAI_API_KEY not found in environment or .env file.")
                })?;
            let mut config = OpenAiConfig::new(key, model(DEFAULT_OPENAI_MODEL))
                .with_timeout(settings.timeout_secs);
            if let Some(base_url) = &settings.base_url {
                config = config.with_base_url(base_url.clone());
            }
            Ok(Box::new(OpenAiClient::new(config)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
