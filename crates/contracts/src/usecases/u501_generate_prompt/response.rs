use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub rendered: String,

    /// Счётчик использований после генерации
    pub usage_count: u64,

    /// Ошибка строгого форматирования или сохранения
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
