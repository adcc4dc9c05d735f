//! HTTP-клиент библиотеки промптов (`/api/a001-prompt-library`)

use crate::shared::api_utils::{api_base, error_message, segment};
use contracts::domain::a001_prompt_library::aggregate::UseCaseConfig;
use contracts::domain::a001_prompt_library::dto::{
    CreateFamilyDto, DuplicateUseCaseDto, FamilySummary, MutationResponse, SyncStatus,
    UseCaseUpsertDto,
};
use contracts::domain::a001_prompt_library::search::{SearchQuery, UseCaseHit};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

const BASE: &str = "/api/a001-prompt-library";

fn url(path: &str) -> String {
    format!("{}{}{}", api_base(), BASE, path)
}

fn use_case_url(family: &str, use_case: &str) -> String {
    url(&format!("/use-cases/{}/{}", segment(family), segment(use_case)))
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn get<T: DeserializeOwned>(full_url: &str) -> Result<T, String> {
    let response = Request::get(full_url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

pub async fn fetch_status() -> Result<SyncStatus, String> {
    get(&url("/status")).await
}

pub async fn reload_library() -> Result<MutationResponse, String> {
    let response = Request::post(&url("/reload"))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

/// Документ в том виде, в котором он хранится в gist
pub async fn export_library() -> Result<serde_json::Value, String> {
    get(&url("/export")).await
}

pub async fn fetch_tags() -> Result<Vec<String>, String> {
    get(&url("/tags")).await
}

pub async fn search(query: &SearchQuery) -> Result<Vec<UseCaseHit>, String> {
    let mut params = vec![format!("sort={}", query.sort.as_str())];
    if let Some(family) = &query.family {
        params.push(format!("family={}", segment(family)));
    }
    if !query.text.trim().is_empty() {
        params.push(format!("q={}", segment(query.text.trim())));
    }
    if !query.tags.is_empty() {
        let tags: Vec<&str> = query.tags.iter().map(String::as_str).collect();
        params.push(format!("tags={}", segment(&tags.join(","))));
    }
    get(&format!("{}?{}", url("/search"), params.join("&"))).await
}

pub async fn fetch_families() -> Result<Vec<FamilySummary>, String> {
    get(&url("/families")).await
}

pub async fn create_family(name: &str) -> Result<MutationResponse, String> {
    let dto = CreateFamilyDto {
        name: name.to_string(),
    };
    let response = Request::post(&url("/families"))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

pub async fn delete_family(name: &str) -> Result<MutationResponse, String> {
    let response = Request::delete(&url(&format!("/families/{}", segment(name))))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

pub async fn fetch_use_case(family: &str, use_case: &str) -> Result<UseCaseConfig, String> {
    get(&use_case_url(family, use_case)).await
}

pub async fn save_use_case(
    family: &str,
    name: &str,
    dto: &UseCaseUpsertDto,
) -> Result<MutationResponse, String> {
    let response = Request::post(&use_case_url(family, name))
        .json(dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

pub async fn duplicate_use_case(
    family: &str,
    use_case: &str,
    new_name: Option<String>,
) -> Result<MutationResponse, String> {
    let dto = DuplicateUseCaseDto { new_name };
    let response = Request::post(&format!("{}/duplicate", use_case_url(family, use_case)))
        .json(&dto)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}

pub async fn delete_use_case(family: &str, use_case: &str) -> Result<MutationResponse, String> {
    let response = Request::delete(&use_case_url(family, use_case))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read(response).await
}
