use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_prompt_library::aggregate::{LibraryError, PromptLibrary, UseCaseConfig};
use contracts::domain::a001_prompt_library::dto::{
    CreateFamilyDto, DuplicateUseCaseDto, FamilySummary, LoadSource, MutationResponse,
    SyncStatus, UseCaseUpsertDto,
};
use contracts::domain::a001_prompt_library::search::{SearchQuery, SearchSort, UseCaseHit};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::a001_prompt_library::service;

pub type ApiError = (StatusCode, Json<Value>);

/// Доменная ошибка -> HTTP статус + {"error": ...}
pub fn library_error(e: LibraryError) -> ApiError {
    let status = match &e {
        LibraryError::FamilyNotFound(_) | LibraryError::UseCaseNotFound(_, _) => {
            StatusCode::NOT_FOUND
        }
        LibraryError::DuplicateFamily(_) | LibraryError::DuplicateUseCase(_, _) => {
            StatusCode::CONFLICT
        }
        LibraryError::EmptyName | LibraryError::Invalid(_) => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Prompt library request rejected: {}", e);
    (status, Json(json!({ "error": e.to_string() })))
}

/// GET /api/a001-prompt-library
pub async fn get_library() -> Json<PromptLibrary> {
    Json(service::get_library().await)
}

/// GET /api/a001-prompt-library/status
pub async fn get_status() -> Json<SyncStatus> {
    Json(service::status().await)
}

/// POST /api/a001-prompt-library/reload
pub async fn reload() -> Json<MutationResponse> {
    let report = service::reload().await;
    let message = match report.source {
        LoadSource::Remote => "Library reloaded from the gist".to_string(),
        LoadSource::Defaults => report.messages.join(" "),
    };
    Json(MutationResponse {
        ok: report.source == LoadSource::Remote,
        message,
        persist_warning: None,
        warnings: report.warnings,
    })
}

/// GET /api/a001-prompt-library/export
pub async fn export() -> Json<Value> {
    Json(service::export().await)
}

/// GET /api/a001-prompt-library/tags
pub async fn list_tags() -> Json<Vec<String>> {
    Json(service::tags().await)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub family: Option<String>,
    #[serde(default)]
    pub q: String,
    /// Теги через запятую
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub sort: String,
}

impl SearchParams {
    fn into_query(self) -> SearchQuery {
        SearchQuery {
            family: self.family.filter(|f| !f.trim().is_empty()),
            text: self.q,
            tags: self
                .tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            sort: SearchSort::from_str(&self.sort),
        }
    }
}

/// GET /api/a001-prompt-library/search?family=&q=&tags=a,b&sort=
pub async fn search(Query(params): Query<SearchParams>) -> Json<Vec<UseCaseHit>> {
    Json(service::search(params.into_query()).await)
}

/// GET /api/a001-prompt-library/families
pub async fn list_families() -> Json<Vec<FamilySummary>> {
    Json(service::list_families().await)
}

/// POST /api/a001-prompt-library/families
pub async fn create_family(
    Json(dto): Json<CreateFamilyDto>,
) -> Result<Json<MutationResponse>, ApiError> {
    service::create_family(dto)
        .await
        .map(Json)
        .map_err(library_error)
}

/// DELETE /api/a001-prompt-library/families/:family
pub async fn delete_family(
    Path(family): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    service::delete_family(&family)
        .await
        .map(Json)
        .map_err(library_error)
}

/// GET /api/a001-prompt-library/use-cases/:family/:use_case
pub async fn get_use_case(
    Path((family, use_case)): Path<(String, String)>,
) -> Result<Json<UseCaseConfig>, ApiError> {
    service::get_use_case(&family, &use_case)
        .await
        .map(Json)
        .ok_or_else(|| library_error(LibraryError::UseCaseNotFound(family, use_case)))
}

/// POST /api/a001-prompt-library/use-cases/:family/:use_case
pub async fn upsert_use_case(
    Path((family, use_case)): Path<(String, String)>,
    Json(dto): Json<UseCaseUpsertDto>,
) -> Result<Json<MutationResponse>, ApiError> {
    tracing::debug!(
        "Received use case upsert: {} / {} (original {:?})",
        family,
        use_case,
        dto.original_name
    );
    service::upsert_use_case(&family, &use_case, dto)
        .await
        .map(Json)
        .map_err(library_error)
}

/// DELETE /api/a001-prompt-library/use-cases/:family/:use_case
pub async fn delete_use_case(
    Path((family, use_case)): Path<(String, String)>,
) -> Result<Json<MutationResponse>, ApiError> {
    service::delete_use_case(&family, &use_case)
        .await
        .map(Json)
        .map_err(library_error)
}

/// POST /api/a001-prompt-library/use-cases/:family/:use_case/duplicate
pub async fn duplicate_use_case(
    Path((family, use_case)): Path<(String, String)>,
    dto: Option<Json<DuplicateUseCaseDto>>,
) -> Result<Json<MutationResponse>, ApiError> {
    let dto = dto.map(|Json(d)| d).unwrap_or_default();
    service::duplicate_use_case(&family, &use_case, dto)
        .await
        .map(Json)
        .map_err(library_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            library_error(LibraryError::FamilyNotFound("x".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            library_error(LibraryError::DuplicateUseCase("f".into(), "u".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(library_error(LibraryError::EmptyName).0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_search_params() {
        let params = SearchParams {
            family: Some(" ".into()),
            q: "post".into(),
            tags: "social, ops,,".into(),
            sort: "most_used".into(),
        };
        let query = params.into_query();
        assert_eq!(query.family, None);
        assert_eq!(query.tags.len(), 2);
        assert!(query.tags.contains("ops"));
        assert_eq!(query.sort, SearchSort::MostUsed);
    }
}
