use crate::domain::a001_prompt_library::aggregate::VariableValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Запрос на генерацию промпта по use case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub family: String,

    pub use_case: String,

    /// Значения из формы; отсутствующие берутся из default переменной
    #[serde(default)]
    pub values: BTreeMap<String, VariableValue>,

    /// Строгий режим: каждый `{name}` обязан иметь значение
    #[serde(default)]
    pub strict: bool,
}
