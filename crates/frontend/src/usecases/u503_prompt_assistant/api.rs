use crate::shared::api_utils::{api_url, error_message};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u503_prompt_assistant::{
    MetaPromptRequest, MetaPromptResponse, PromptAssistant,
};
use gloo_net::http::Request;

/// Собрать мета-промпт; при `send_to_llm` сервер дополнительно вызывает модель
pub async fn build_meta_prompt(request: &MetaPromptRequest) -> Result<MetaPromptResponse, String> {
    let response = Request::post(&api_url(PromptAssistant::api_path()))
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
