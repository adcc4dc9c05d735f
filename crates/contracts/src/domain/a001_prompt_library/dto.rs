use super::aggregate::LibraryStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Сохранение use case из редактора.
///
/// Имя use case берётся из пути запроса. `config` передаётся как есть и
/// проходит ту же нормализацию, что и загруженный документ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseCaseUpsertDto {
    /// Прежнее имя при переименовании
    #[serde(default)]
    pub original_name: Option<String>,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateUseCaseDto {
    #[serde(default)]
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFamilyDto {
    pub name: String,
}

/// Ответ на любое изменение библиотеки.
///
/// Изменение в памяти применяется всегда; если сохранение в gist не удалось,
/// причина приходит в `persist_warning`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationResponse {
    pub ok: bool,
    pub message: String,
    pub persist_warning: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Remote,
    #[default]
    Defaults,
}

/// Состояние синхронизации с удалённым хранилищем
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub remote_enabled: bool,
    pub source: LoadSource,
    pub last_error: Option<String>,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub last_saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub load_warnings: Vec<String>,
    pub stats: LibraryStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySummary {
    pub name: String,
    pub use_cases: usize,
    pub total_usage: u64,
}
