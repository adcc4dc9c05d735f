use crate::shared::api_utils::{api_url, error_message};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_inject_json::{InjectJson, InjectReport, InjectRequest};
use gloo_net::http::Request;

pub async fn inject(request: &InjectRequest) -> Result<InjectReport, String> {
    let response = Request::post(&api_url(InjectJson::api_path()))
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
