use crate::shared::api_utils::{api_url, error_message};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_generate_prompt::{GeneratePrompt, GenerateRequest, GenerateResponse};
use gloo_net::http::Request;

/// Подставить значения в шаблон и увеличить счётчик использования
pub async fn generate(request: &GenerateRequest) -> Result<GenerateResponse, String> {
    let response = Request::post(&api_url(GeneratePrompt::api_path()))
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
