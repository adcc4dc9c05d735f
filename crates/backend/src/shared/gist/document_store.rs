use super::gist_api_client::GistError;
use async_trait::async_trait;

/// Удалённое хранилище одного JSON-документа библиотеки.
///
/// Документ читается и пишется целиком, без версий и блокировок.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch(&self) -> Result<String, GistError>;

    async fn store(&self, content: &str) -> Result<(), GistError>;

    /// Для логов: откуда читаем
    fn describe(&self) -> String;
}
