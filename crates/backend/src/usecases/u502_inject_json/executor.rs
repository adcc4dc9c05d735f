use crate::shared::gist::LibraryStore;
use contracts::usecases::u502_inject_json::{inject_use_cases, InjectError, InjectReport, InjectRequest};
use std::sync::Arc;

/// Executor для UseCase вставки JSON
pub struct InjectExecutor {
    store: Arc<LibraryStore>,
}

impl InjectExecutor {
    pub fn new(store: Arc<LibraryStore>) -> Self {
        Self { store }
    }

    /// Проверка и добавление записей; сохранение только если что-то добавлено
    pub async fn inject(&self, request: InjectRequest) -> Result<InjectReport, InjectError> {
        let (mut report, persist_warning) = self
            .store
            .mutate_when(
                |library| {
                    inject_use_cases(library, &request.family, &request.payload, request.overwrite)
                },
                |report| !report.added.is_empty(),
            )
            .await?;

        tracing::info!("JSON injection: {}", report.summary());
        for failure in &report.failures {
            tracing::warn!("Rejected entry: {}", failure);
        }
        report.persist_warning = persist_warning;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::gist::{DocumentStore, GistError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn fetch(&self) -> Result<String, GistError> {
            Err(GistError::NotFound)
        }

        async fn store(&self, _content: &str) -> Result<(), GistError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[tokio::test]
    async fn test_valid_and_missing_template() {
        let remote = Arc::new(CountingStore::default());
        let store = Arc::new(LibraryStore::new(Some(remote.clone() as Arc<dyn DocumentStore>)));
        let executor = InjectExecutor::new(store.clone());

        let report = executor
            .inject(InjectRequest {
                family: "Support".into(),
                payload: json!({
                    "Refund reply": { "template": "Dear {customer}, ..." },
                    "No template": { "variables": [] }
                }),
                overwrite: false,
            })
            .await
            .unwrap();

        assert_eq!(report.added, vec!["Refund reply".to_string()]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("No template:"));
        assert_eq!(remote.writes.load(Ordering::SeqCst), 1);
        assert!(store.snapshot().await.use_case("Support", "Refund reply").is_some());
    }

    #[tokio::test]
    async fn test_nothing_added_is_not_saved() {
        let remote = Arc::new(CountingStore::default());
        let store = LibraryStore::new(Some(remote.clone() as Arc<dyn DocumentStore>));
        let executor = InjectExecutor::new(Arc::new(store));

        let report = executor
            .inject(InjectRequest {
                family: "Support".into(),
                payload: json!({ "Broken": 1 }),
                overwrite: false,
            })
            .await
            .unwrap();

        assert!(report.added.is_empty());
        assert_eq!(remote.writes.load(Ordering::SeqCst), 0);

        let err = executor
            .inject(InjectRequest {
                family: "Support".into(),
                payload: json!("text"),
                overwrite: false,
            })
            .await
            .unwrap_err();
        assert_eq!(err, InjectError::NotAnObject);
    }
}
