use serde::{Deserialize, Serialize};

/// Откуда взят шаблон мета-промпта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    File,
    Builtin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaPromptResponse {
    pub meta_prompt: String,

    pub template_source: TemplateSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_reply: Option<String>,

    /// JSON из ответа LLM, готовый для вставки (u502)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_payload: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
