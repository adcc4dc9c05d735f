use serde::{Deserialize, Serialize};

/// Запрос на вставку use case из JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectRequest {
    /// Целевое семейство (создаётся при первой успешной записи)
    pub family: String,

    /// Объект вида { "<use case>": { "template": ..., "variables": [...] } }
    pub payload: serde_json::Value,

    /// Заменять существующие use case с тем же именем
    #[serde(default)]
    pub overwrite: bool,
}
