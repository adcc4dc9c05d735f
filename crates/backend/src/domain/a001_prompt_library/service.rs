use crate::shared::gist::library_store::{get_store, LoadReport};
use contracts::domain::a001_prompt_library::aggregate::{LibraryError, PromptLibrary, UseCaseConfig};
use contracts::domain::a001_prompt_library::dto::{
    CreateFamilyDto, DuplicateUseCaseDto, FamilySummary, MutationResponse, SyncStatus,
    UseCaseUpsertDto,
};
use contracts::domain::a001_prompt_library::normalizer::{normalize_use_case, to_persisted};
use contracts::domain::a001_prompt_library::search::{search_use_cases, SearchQuery, UseCaseHit};

pub async fn get_library() -> PromptLibrary {
    get_store().snapshot().await
}

pub async fn status() -> SyncStatus {
    get_store().sync_status().await
}

/// Перечитать документ из gist
pub async fn reload() -> LoadReport {
    tracing::info!("Reloading prompt library on request");
    get_store().load().await
}

/// Документ в том виде, в каком он хранится в gist
pub async fn export() -> serde_json::Value {
    get_store().read(to_persisted).await
}

pub async fn list_families() -> Vec<FamilySummary> {
    get_store()
        .read(|library| {
            library
                .families
                .iter()
                .map(|(name, family)| FamilySummary {
                    name: name.clone(),
                    use_cases: family.len(),
                    total_usage: family.values().map(|c| c.usage_count).sum(),
                })
                .collect()
        })
        .await
}

pub async fn tags() -> Vec<String> {
    get_store().read(|library| library.all_tags()).await
}

pub async fn search(query: SearchQuery) -> Vec<UseCaseHit> {
    get_store()
        .read(|library| search_use_cases(library, &query))
        .await
}

pub async fn get_use_case(family: &str, name: &str) -> Option<UseCaseConfig> {
    get_store()
        .read(|library| library.use_case(family, name).cloned())
        .await
}

pub async fn create_family(dto: CreateFamilyDto) -> Result<MutationResponse, LibraryError> {
    let name = dto.name.trim().to_string();
    let (_, persist_warning) = get_store()
        .mutate(|library| library.add_family(&name))
        .await?;
    tracing::info!("Family '{}' created", name);
    Ok(MutationResponse {
        ok: true,
        message: format!("Family '{}' created", name),
        persist_warning,
        warnings: Vec::new(),
    })
}

pub async fn delete_family(name: &str) -> Result<MutationResponse, LibraryError> {
    let (removed, persist_warning) = get_store()
        .mutate(|library| library.delete_family(name))
        .await?;
    tracing::info!("Family '{}' deleted with {} use cases", name, removed.len());
    Ok(MutationResponse {
        ok: true,
        message: format!("Family '{}' deleted ({} use cases)", name, removed.len()),
        persist_warning,
        warnings: Vec::new(),
    })
}

/// Создание или изменение use case из редактора
pub async fn upsert_use_case(
    family: &str,
    name: &str,
    dto: UseCaseUpsertDto,
) -> Result<MutationResponse, LibraryError> {
    let fields = dto
        .config
        .as_object()
        .ok_or_else(|| LibraryError::Invalid("config must be a JSON object".into()))?;
    let (config, warnings) = normalize_use_case(fields);
    if config.template.trim().is_empty() {
        return Err(LibraryError::Invalid("template cannot be empty".into()));
    }

    let original = dto.original_name.clone();
    let (_, persist_warning) = get_store()
        .mutate(|library| library.upsert_use_case(family, original.as_deref(), name, config))
        .await?;

    let message = match original.as_deref().map(str::trim) {
        Some(old) if !old.is_empty() && old != name.trim() => {
            format!("Use case '{}' renamed to '{}'", old, name.trim())
        }
        _ => format!("Use case '{}' saved", name.trim()),
    };
    tracing::info!("{} in family '{}'", message, family);
    for warning in &warnings {
        tracing::warn!("{} / {}: {}", family, name, warning);
    }

    Ok(MutationResponse {
        ok: true,
        message,
        persist_warning,
        warnings,
    })
}

pub async fn duplicate_use_case(
    family: &str,
    name: &str,
    dto: DuplicateUseCaseDto,
) -> Result<MutationResponse, LibraryError> {
    let (new_name, persist_warning) = get_store()
        .mutate(|library| library.duplicate_use_case(family, name, dto.new_name.as_deref()))
        .await?;
    Ok(MutationResponse {
        ok: true,
        message: format!("Use case '{}' duplicated as '{}'", name, new_name),
        persist_warning,
        warnings: Vec::new(),
    })
}

pub async fn delete_use_case(family: &str, name: &str) -> Result<MutationResponse, LibraryError> {
    let (_, persist_warning) = get_store()
        .mutate(|library| library.delete_use_case(family, name))
        .await?;
    tracing::info!("Use case '{}' deleted from '{}'", name, family);
    Ok(MutationResponse {
        ok: true,
        message: format!("Use case '{}' deleted", name),
        persist_warning,
        warnings: Vec::new(),
    })
}
