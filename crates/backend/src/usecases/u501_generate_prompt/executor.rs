use crate::shared::gist::LibraryStore;
use contracts::domain::a001_prompt_library::aggregate::LibraryError;
use contracts::usecases::u501_generate_prompt::{render_use_case, GenerateRequest, GenerateResponse};
use std::sync::Arc;

/// Executor для UseCase генерации промпта
pub struct GenerateExecutor {
    store: Arc<LibraryStore>,
}

impl GenerateExecutor {
    pub fn new(store: Arc<LibraryStore>) -> Self {
        Self { store }
    }

    /// Подстановка значений, учёт использования и сохранение.
    ///
    /// Ошибка строгого форматирования и ошибка сохранения не прерывают
    /// генерацию, обе попадают в `warning`.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LibraryError> {
        let config = self
            .store
            .read(|library| library.use_case(&request.family, &request.use_case).cloned())
            .await
            .ok_or_else(|| {
                LibraryError::UseCaseNotFound(request.family.clone(), request.use_case.clone())
            })?;

        let rendering = render_use_case(&config, &request.values, request.strict);
        if let Some(error) = &rendering.error {
            tracing::warn!(
                "Strict formatting failed for {} / {}: {}",
                request.family,
                request.use_case,
                error
            );
        }

        let (usage_count, persist_warning) = self
            .store
            .mutate(|library| library.record_usage(&request.family, &request.use_case))
            .await?;
        tracing::info!(
            "Prompt generated from {} / {} (usage {})",
            request.family,
            request.use_case,
            usage_count
        );

        let warning = match (rendering.error, persist_warning) {
            (None, None) => None,
            (Some(e), None) | (None, Some(e)) => Some(e),
            (Some(render), Some(persist)) => Some(format!("{} {}", render, persist)),
        };

        Ok(GenerateResponse {
            rendered: rendering.text,
            usage_count,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_prompt_library::aggregate::{UseCaseConfig, VariableValue};
    use std::collections::BTreeMap;

    fn executor() -> GenerateExecutor {
        GenerateExecutor::new(Arc::new(LibraryStore::new(None)))
    }

    #[tokio::test]
    async fn test_generate_counts_usage() {
        let executor = executor();
        let mut values = BTreeMap::new();
        values.insert("topic".to_string(), VariableValue::Text("v2 launch".into()));
        let request = GenerateRequest {
            family: "Marketing".into(),
            use_case: "Social post".into(),
            values,
            strict: false,
        };

        let first = executor.generate(request.clone()).await.unwrap();
        assert!(first.rendered.contains("Draft a LinkedIn post announcing v2 launch."));
        assert!(first.rendered.contains("{hashtag}"));
        assert_eq!(first.usage_count, 1);
        assert_eq!(first.warning, None);

        let second = executor.generate(request).await.unwrap();
        assert_eq!(second.usage_count, 2);
    }

    #[tokio::test]
    async fn test_strict_mode_keeps_escaped_braces() {
        let executor = executor();
        let request = GenerateRequest {
            family: "Marketing".into(),
            use_case: "Social post".into(),
            values: BTreeMap::new(),
            strict: true,
        };
        // {{hashtag}} — экранирование, строгий режим проходит
        let response = executor.generate(request).await.unwrap();
        assert!(response.warning.is_none());
        assert!(response.rendered.ends_with("{hashtag} left for the scheduler."));
    }

    #[tokio::test]
    async fn test_strict_failure_returns_raw_template() {
        let executor = executor();
        executor
            .store
            .mutate(|library| {
                library.upsert_use_case(
                    "Ops",
                    None,
                    "Handover",
                    UseCaseConfig::new("Handover for {team}"),
                )
            })
            .await
            .unwrap();
        let request = GenerateRequest {
            family: "Ops".into(),
            use_case: "Handover".into(),
            values: BTreeMap::new(),
            strict: true,
        };

        let response = executor.generate(request).await.unwrap();
        assert_eq!(response.rendered, "Handover for {team}");
        assert!(response.warning.unwrap().contains("{team}"));
        assert_eq!(response.usage_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_use_case() {
        let request = GenerateRequest {
            family: "Marketing".into(),
            use_case: "Nope".into(),
            values: BTreeMap::new(),
            strict: false,
        };
        assert_eq!(
            executor().generate(request).await.unwrap_err(),
            LibraryError::UseCaseNotFound("Marketing".into(), "Nope".into())
        );
    }
}
