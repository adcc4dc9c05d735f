pub mod openai_provider;
pub mod types;

pub use types::*;

use crate::shared::config::LlmConfig;
use openai_provider::OpenAiProvider;
use std::sync::Arc;

/// Провайдер по секции [llm] из config.toml
pub fn provider_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if config.api_key.trim().is_empty() {
        return Err(LlmError::AuthError("api_key is empty".into()));
    }
    let provider = match config.api_endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(endpoint) => OpenAiProvider::new_with_endpoint(
            endpoint.to_string(),
            config.api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        ),
        None => OpenAiProvider::new(
            config.api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        ),
    };
    Ok(Arc::new(provider))
}
