use serde::{Deserialize, Serialize};

/// Итог вставки: что добавлено и почему отклонено остальное
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectReport {
    pub family: String,

    pub added: Vec<String>,

    /// "<use case>: <причина>"
    pub failures: Vec<String>,

    /// Замечания нормализатора по добавленным записям
    pub warnings: Vec<String>,

    /// Ошибка сохранения в gist (заполняет backend)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_warning: Option<String>,
}

impl InjectReport {
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} rejected in '{}'",
            self.added.len(),
            self.failures.len(),
            self.family
        )
    }
}
