use axum::{http::StatusCode, Json};
use once_cell::sync::{Lazy, OnceCell};
use serde_json::json;
use std::sync::Arc;

use super::a001_prompt_library::{library_error, ApiError};
use crate::shared::config::Config;
use crate::shared::gist::library_store::get_store;
use crate::shared::llm::provider_from_config;
use crate::usecases;

// ============================================================================
// UseCase u501: Generate prompt
// ============================================================================

static GENERATE_EXECUTOR: Lazy<usecases::u501_generate_prompt::GenerateExecutor> =
    Lazy::new(|| usecases::u501_generate_prompt::GenerateExecutor::new(get_store().clone()));

/// POST /api/u501/generate
pub async fn u501_generate(
    Json(request): Json<contracts::usecases::u501_generate_prompt::GenerateRequest>,
) -> Result<Json<contracts::usecases::u501_generate_prompt::GenerateResponse>, ApiError> {
    GENERATE_EXECUTOR
        .generate(request)
        .await
        .map(Json)
        .map_err(library_error)
}

// ============================================================================
// UseCase u502: Inject JSON
// ============================================================================

static INJECT_EXECUTOR: Lazy<usecases::u502_inject_json::InjectExecutor> =
    Lazy::new(|| usecases::u502_inject_json::InjectExecutor::new(get_store().clone()));

/// POST /api/u502/inject
pub async fn u502_inject(
    Json(request): Json<contracts::usecases::u502_inject_json::InjectRequest>,
) -> Result<Json<contracts::usecases::u502_inject_json::InjectReport>, ApiError> {
    match INJECT_EXECUTOR.inject(request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::warn!("JSON injection rejected: {}", e);
            Err((StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))))
        }
    }
}

// ============================================================================
// UseCase u503: Prompt assistant
// ============================================================================

static ASSISTANT_EXECUTOR: OnceCell<usecases::u503_prompt_assistant::AssistantExecutor> =
    OnceCell::new();

/// Ассистенту нужны пути шаблонов и LLM из конфигурации
pub fn initialize(config: &Config) {
    let llm = config.llm.as_ref().and_then(|llm| match provider_from_config(llm) {
        Ok(provider) => {
            tracing::info!("Prompt assistant LLM: {} ({})", provider.provider_name(), llm.model);
            Some(provider)
        }
        Err(e) => {
            tracing::warn!("LLM for the prompt assistant is disabled: {}", e);
            None
        }
    });
    let executor = usecases::u503_prompt_assistant::AssistantExecutor::new(
        get_store().clone(),
        config.templates.clone(),
        llm,
    );
    if ASSISTANT_EXECUTOR.set(executor).is_err() {
        tracing::warn!("Prompt assistant was already initialized");
    }
}

/// POST /api/u503/meta-prompt
pub async fn u503_meta_prompt(
    Json(request): Json<contracts::usecases::u503_prompt_assistant::MetaPromptRequest>,
) -> Result<Json<contracts::usecases::u503_prompt_assistant::MetaPromptResponse>, StatusCode> {
    let Some(executor) = ASSISTANT_EXECUTOR.get() else {
        tracing::error!("Prompt assistant is not initialized");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    Ok(Json(executor.build(request).await))
}
