use super::document_store::DocumentStore;
use super::gist_api_client::{GistApiClient, GistError};
use crate::shared::config::GistConfig;
use chrono::{DateTime, Utc};
use contracts::domain::a001_prompt_library::aggregate::PromptLibrary;
use contracts::domain::a001_prompt_library::defaults::default_library;
use contracts::domain::a001_prompt_library::dto::{LoadSource, SyncStatus};
use contracts::domain::a001_prompt_library::normalizer::{
    normalize_document, to_persisted, Normalized,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub static LIBRARY_STORE: OnceCell<Arc<LibraryStore>> = OnceCell::new();

/// Итог загрузки библиотеки при старте или по кнопке "Reload"
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Замечания нормализатора
    pub warnings: Vec<String>,
    /// Сообщения для пользователя (ошибки gist, результат записи defaults)
    pub messages: Vec<String>,
}

struct LibraryState {
    library: PromptLibrary,
    source: LoadSource,
    last_error: Option<String>,
    last_loaded_at: Option<DateTime<Utc>>,
    last_saved_at: Option<DateTime<Utc>>,
    load_warnings: Vec<String>,
}

/// Библиотека шаблонов в памяти процесса + зеркало в gist.
///
/// Каждая мутация сохраняет документ целиком. Конкурентные сессии
/// перезаписывают друг друга (last writer wins). Внутри процесса мутация
/// и её запись в gist идут под `save_guard`, поэтому более старый снимок
/// не может перезаписать более новый.
pub struct LibraryStore {
    state: RwLock<LibraryState>,
    remote: Option<Arc<dyn DocumentStore>>,
    save_guard: Mutex<()>,
}

impl LibraryStore {
    pub fn new(remote: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            state: RwLock::new(LibraryState {
                library: default_library(),
                source: LoadSource::Defaults,
                last_error: None,
                last_loaded_at: None,
                last_saved_at: None,
                load_warnings: Vec::new(),
            }),
            remote,
            save_guard: Mutex::new(()),
        }
    }

    /// Без учётных данных синхронизация отключается, это не ошибка
    pub fn from_config(config: &GistConfig) -> Self {
        let remote: Option<Arc<dyn DocumentStore>> = match GistApiClient::new(config) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Remote sync disabled: {}", e);
                None
            }
        };
        Self::new(remote)
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Загрузка документа из gist.
    ///
    /// При любой ошибке используется библиотека по умолчанию, которую
    /// затем пытаемся записать в gist. Неудача записи не мешает работе.
    pub async fn load(&self) -> LoadReport {
        let _guard = self.save_guard.lock().await;
        let Some(remote) = self.remote.clone() else {
            let message = GistError::MissingCredentials.user_message();
            self.replace(default_library(), LoadSource::Defaults, Vec::new(), Some(message.clone()))
                .await;
            return LoadReport {
                source: LoadSource::Defaults,
                warnings: Vec::new(),
                messages: vec![message],
            };
        };

        tracing::info!("Loading prompt library from {}", remote.describe());
        match fetch_document(remote.as_ref()).await {
            Ok(Normalized { library, warnings }) => {
                for warning in &warnings {
                    tracing::warn!("Normalizer: {}", warning);
                }
                let stats = library.stats();
                tracing::info!(
                    "Prompt library loaded: {} families, {} use cases",
                    stats.families,
                    stats.use_cases
                );
                self.replace(library, LoadSource::Remote, warnings.clone(), None)
                    .await;
                LoadReport {
                    source: LoadSource::Remote,
                    warnings,
                    messages: Vec::new(),
                }
            }
            Err(e) => {
                tracing::error!("Failed to load prompt library: {}", e);
                let mut messages = vec![format!(
                    "{} Using the built-in library.",
                    e.user_message()
                )];
                let defaults = default_library();
                self.replace(
                    defaults.clone(),
                    LoadSource::Defaults,
                    Vec::new(),
                    Some(e.user_message()),
                )
                .await;

                match self.write_remote(remote.as_ref(), &defaults).await {
                    Ok(()) => {
                        tracing::info!("Seeded {} with the default library", remote.describe());
                        messages.push("The built-in library was written to the gist.".into());
                    }
                    Err(seed_err) => {
                        tracing::warn!("Could not seed the gist with defaults: {}", seed_err);
                        messages.push(format!(
                            "Could not write the built-in library to the gist: {}",
                            seed_err.user_message()
                        ));
                    }
                }

                LoadReport {
                    source: LoadSource::Defaults,
                    warnings: Vec::new(),
                    messages,
                }
            }
        }
    }

    /// Сохранение всей библиотеки одним запросом
    pub async fn save(&self) -> Result<(), GistError> {
        let _guard = self.save_guard.lock().await;
        self.save_locked().await
    }

    /// Вызывать только под `save_guard`
    async fn save_locked(&self) -> Result<(), GistError> {
        let Some(remote) = self.remote.clone() else {
            tracing::debug!("Remote sync disabled, library kept in memory only");
            return Ok(());
        };
        let library = self.snapshot().await;
        self.write_remote(remote.as_ref(), &library).await?;
        self.state.write().await.last_error = None;
        Ok(())
    }

    pub async fn snapshot(&self) -> PromptLibrary {
        self.state.read().await.library.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&PromptLibrary) -> R) -> R {
        let state = self.state.read().await;
        f(&state.library)
    }

    /// Изменение библиотеки и сохранение.
    ///
    /// Если closure вернула ошибку, сохранения нет. Ошибка сохранения
    /// возвращается текстом рядом с результатом, изменение в памяти остаётся.
    pub async fn mutate<T, E>(
        &self,
        f: impl FnOnce(&mut PromptLibrary) -> Result<T, E>,
    ) -> Result<(T, Option<String>), E> {
        self.mutate_when(f, |_| true).await
    }

    /// Как `mutate`, но сохраняет только если `changed` вернул true
    pub async fn mutate_when<T, E>(
        &self,
        f: impl FnOnce(&mut PromptLibrary) -> Result<T, E>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<(T, Option<String>), E> {
        let _guard = self.save_guard.lock().await;
        let result = {
            let mut state = self.state.write().await;
            f(&mut state.library)?
        };
        if !changed(&result) {
            return Ok((result, None));
        }

        let persist_warning = match self.save_locked().await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Failed to save prompt library: {}", e);
                Some(e.user_message())
            }
        };
        Ok((result, persist_warning))
    }

    pub async fn sync_status(&self) -> SyncStatus {
        let state = self.state.read().await;
        SyncStatus {
            remote_enabled: self.remote_enabled(),
            source: state.source,
            last_error: state.last_error.clone(),
            last_loaded_at: state.last_loaded_at,
            last_saved_at: state.last_saved_at,
            load_warnings: state.load_warnings.clone(),
            stats: state.library.stats(),
        }
    }

    async fn replace(
        &self,
        library: PromptLibrary,
        source: LoadSource,
        warnings: Vec<String>,
        error: Option<String>,
    ) {
        let mut state = self.state.write().await;
        state.library = library;
        state.source = source;
        state.load_warnings = warnings;
        state.last_error = error;
        state.last_loaded_at = Some(Utc::now());
    }

    async fn write_remote(
        &self,
        remote: &dyn DocumentStore,
        library: &PromptLibrary,
    ) -> Result<(), GistError> {
        let content = persisted_json(library)?;
        match remote.store(&content).await {
            Ok(()) => {
                self.state.write().await.last_saved_at = Some(Utc::now());
                Ok(())
            }
            Err(e) => {
                self.state.write().await.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

async fn fetch_document(remote: &dyn DocumentStore) -> Result<Normalized, GistError> {
    let content = remote.fetch().await?;
    if content.trim().is_empty() {
        return Err(GistError::EmptyContent);
    }
    let raw: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| GistError::InvalidJson(e.to_string()))?;
    normalize_document(&raw).map_err(|e| GistError::InvalidJson(e.to_string()))
}

/// JSON документа для gist (плоские типы, отступы для читаемого diff)
pub fn persisted_json(library: &PromptLibrary) -> Result<String, GistError> {
    serde_json::to_string_pretty(&to_persisted(library))
        .map_err(|e| GistError::InvalidJson(e.to_string()))
}

/// Создание глобального хранилища и первая загрузка
pub async fn initialize(config: &GistConfig) -> LoadReport {
    let store = Arc::new(LibraryStore::from_config(config));
    let report = store.load().await;
    for message in &report.messages {
        tracing::warn!("{}", message);
    }
    if LIBRARY_STORE.set(store).is_err() {
        tracing::warn!("Library store was already initialized");
    }
    report
}

pub fn get_store() -> &'static Arc<LibraryStore> {
    LIBRARY_STORE
        .get()
        .expect("Library store has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::domain::a001_prompt_library::aggregate::{LibraryError, UseCaseConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Хранилище в памяти вместо gist
    #[derive(Default)]
    struct FakeStore {
        content: Mutex<Option<String>>,
        fetch_error: Option<GistError>,
        store_error: Option<GistError>,
        store_calls: AtomicUsize,
        /// Задержка первой записи: имитация медленного PATCH
        first_store_delay: Option<std::time::Duration>,
    }

    impl FakeStore {
        fn with_content(content: &str) -> Self {
            Self {
                content: Mutex::new(Some(content.to_string())),
                ..Default::default()
            }
        }

        fn stored(&self) -> Option<String> {
            self.content.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn fetch(&self) -> Result<String, GistError> {
            if let Some(e) = &self.fetch_error {
                return Err(e.clone());
            }
            self.stored().ok_or(GistError::FileMissing("library.json".into()))
        }

        async fn store(&self, content: &str) -> Result<(), GistError> {
            let call = self.store_calls.fetch_add(1, Ordering::SeqCst);
            if let (0, Some(delay)) = (call, self.first_store_delay) {
                tokio::time::sleep(delay).await;
            }
            if let Some(e) = &self.store_error {
                return Err(e.clone());
            }
            *self.content.lock().unwrap() = Some(content.to_string());
            Ok(())
        }

        fn describe(&self) -> String {
            "fake".into()
        }
    }

    fn store_with(fake: &Arc<FakeStore>) -> LibraryStore {
        let remote: Arc<dyn DocumentStore> = fake.clone();
        LibraryStore::new(Some(remote))
    }

    #[tokio::test]
    async fn test_not_found_uses_defaults_and_seeds_remote() {
        let fake = Arc::new(FakeStore {
            fetch_error: Some(GistError::NotFound),
            ..Default::default()
        });
        let store = store_with(&fake);

        let report = store.load().await;

        assert_eq!(report.source, LoadSource::Defaults);
        assert_eq!(store.snapshot().await.stats(), default_library().stats());
        assert_eq!(fake.store_calls.load(Ordering::SeqCst), 1);

        let seeded: serde_json::Value = serde_json::from_str(&fake.stored().unwrap()).unwrap();
        let normalized = normalize_document(&seeded).unwrap();
        assert_eq!(normalized.library.family_names(), vec!["Engineering", "Marketing"]);
    }

    #[tokio::test]
    async fn test_seed_failure_still_proceeds_with_defaults() {
        let fake = Arc::new(FakeStore {
            fetch_error: Some(GistError::NotFound),
            store_error: Some(GistError::Forbidden),
            ..Default::default()
        });
        let store = store_with(&fake);

        let report = store.load().await;

        assert_eq!(report.source, LoadSource::Defaults);
        assert_eq!(report.messages.len(), 2);
        assert!(report.messages[1].contains("403"));
        assert_eq!(
            store.snapshot().await.family_names(),
            default_library().family_names()
        );

        // сессия продолжается: изменения остаются в памяти
        let (_, warning) = store
            .mutate(|library| library.add_family("Sales"))
            .await
            .unwrap();
        assert!(warning.is_some());
        assert!(store.snapshot().await.family("Sales").is_some());
    }

    #[tokio::test]
    async fn test_remote_document_is_normalized() {
        let fake = Arc::new(FakeStore::with_content(
            r#"{"Ops": {"Runbook": {"template": "Fix {service}", "variables": [{"name": "service"}]}}, "Bad": 5}"#,
        ));
        let store = store_with(&fake);

        let report = store.load().await;

        assert_eq!(report.source, LoadSource::Remote);
        assert_eq!(report.warnings.len(), 1);
        let library = store.snapshot().await;
        assert_eq!(library.family_names(), vec!["Ops"]);
        assert_eq!(library.use_case("Ops", "Runbook").unwrap().variables.len(), 1);
        assert_eq!(fake.store_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        let fake = Arc::new(FakeStore::with_content("{ not json"));
        let store = store_with(&fake);

        let report = store.load().await;

        assert_eq!(report.source, LoadSource::Defaults);
        assert!(report.messages[0].contains("not valid JSON"));
        let status = store.sync_status().await;
        assert!(status.remote_enabled);
        assert!(status.last_saved_at.is_some());
    }

    #[tokio::test]
    async fn test_without_credentials_nothing_is_written() {
        let store = LibraryStore::new(None);
        let report = store.load().await;
        assert_eq!(report.source, LoadSource::Defaults);
        assert!(report.messages[0].contains("GIST_ID"));

        let (_, warning) = store
            .mutate(|library| library.add_family("Sales"))
            .await
            .unwrap();
        assert_eq!(warning, None);
        assert!(!store.sync_status().await.remote_enabled);
    }

    #[tokio::test]
    async fn test_mutate_saves_whole_document_once() {
        let fake = Arc::new(FakeStore::with_content("{}"));
        let store = store_with(&fake);
        store.load().await;

        let (_, warning) = store
            .mutate(|library| {
                library.upsert_use_case("Ops", None, "Runbook", UseCaseConfig::new("Fix {service}"))
            })
            .await
            .unwrap();

        assert_eq!(warning, None);
        assert_eq!(fake.store_calls.load(Ordering::SeqCst), 1);
        assert!(fake.stored().unwrap().contains("Fix {service}"));
    }

    #[tokio::test]
    async fn test_failed_mutation_is_not_saved() {
        let fake = Arc::new(FakeStore::with_content("{}"));
        let store = store_with(&fake);
        store.load().await;

        let err = store
            .mutate(|library| library.delete_family("Nope"))
            .await
            .unwrap_err();

        assert_eq!(err, LibraryError::FamilyNotFound("Nope".into()));
        assert_eq!(fake.store_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_persist_in_order() {
        let fake = Arc::new(FakeStore {
            content: Mutex::new(Some("{}".into())),
            first_store_delay: Some(std::time::Duration::from_millis(100)),
            ..Default::default()
        });
        let store = store_with(&fake);
        store.load().await;

        let (first, second) = tokio::join!(
            store.mutate(|library| library.add_family("A")),
            store.mutate(|library| library.add_family("B")),
        );
        assert_eq!(first.unwrap().1, None);
        assert_eq!(second.unwrap().1, None);

        assert_eq!(store.snapshot().await.family_names(), vec!["A", "B"]);
        let remote: serde_json::Value = serde_json::from_str(&fake.stored().unwrap()).unwrap();
        let remote = normalize_document(&remote).unwrap().library;
        assert_eq!(remote.family_names(), vec!["A", "B"]);
        assert_eq!(fake.store_calls.load(Ordering::SeqCst), 2);
    }
}
