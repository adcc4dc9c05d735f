use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    #[default]
    CreateNew,
    ImproveExisting,
}

impl AssistantMode {
    pub fn label(&self) -> &'static str {
        match self {
            AssistantMode::CreateNew => "Create a new use case",
            AssistantMode::ImproveExisting => "Improve an existing use case",
        }
    }
}

/// Данные формы ассистента
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaPromptRequest {
    #[serde(default)]
    pub mode: AssistantMode,

    #[serde(default)]
    pub family: String,

    #[serde(default)]
    pub use_case_name: String,

    /// Что должен делать промпт
    #[serde(default)]
    pub objective: String,

    /// Ожидаемый формат результата
    #[serde(default)]
    pub expected_output: String,

    /// Текущая конфигурация (режим улучшения); если не передана, backend
    /// берёт её из библиотеки по family/use_case_name
    #[serde(default)]
    pub current_config: Option<serde_json::Value>,

    #[serde(default)]
    pub improvement_goals: String,

    /// Отправить мета-промпт в LLM (если настроен)
    #[serde(default)]
    pub send_to_llm: bool,
}
