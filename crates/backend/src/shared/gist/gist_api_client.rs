use super::document_store::DocumentStore;
use crate::shared::config::GistConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const USER_AGENT: &str = "prompt-forge-backend";
const ACCEPT: &str = "application/vnd.github+json";

/// Ошибки gist API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GistError {
    #[error("Gist credentials are not configured")]
    MissingCredentials,

    #[error("Gist not found")]
    NotFound,

    #[error("Gist token was rejected")]
    Unauthorized,

    #[error("Access to the gist is forbidden")]
    Forbidden,

    #[error("Gist API rejected the update: {0}")]
    Unprocessable(String),

    #[error("Gist API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("File '{0}' is missing in the gist")]
    FileMissing(String),

    #[error("Gist file is empty")]
    EmptyContent,

    #[error("Gist file is not valid JSON: {0}")]
    InvalidJson(String),
}

impl GistError {
    /// Текст для баннера в UI
    pub fn user_message(&self) -> String {
        match self {
            GistError::MissingCredentials => {
                "Remote sync is off: set GIST_ID and GITHUB_TOKEN to enable it.".into()
            }
            GistError::NotFound => "The gist was not found (404). Check GIST_ID.".into(),
            GistError::Unauthorized => "The GitHub token is invalid or expired (401).".into(),
            GistError::Forbidden => {
                "The GitHub token has no access to this gist or the rate limit is hit (403).".into()
            }
            GistError::Unprocessable(details) => {
                format!("GitHub rejected the update (422): {}", details)
            }
            GistError::Http { status, .. } => format!("GitHub API error (HTTP {}).", status),
            GistError::Network(e) => format!("Cannot reach GitHub: {}", e),
            GistError::FileMissing(name) => format!("The gist has no file named '{}'.", name),
            GistError::EmptyContent => "The library file in the gist is empty.".into(),
            GistError::InvalidJson(e) => format!("The library file is not valid JSON: {}", e),
        }
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => GistError::NotFound,
            StatusCode::UNAUTHORIZED => GistError::Unauthorized,
            StatusCode::FORBIDDEN => GistError::Forbidden,
            StatusCode::UNPROCESSABLE_ENTITY => GistError::Unprocessable(body),
            _ => GistError::Http {
                status: status.as_u16(),
                body,
            },
        }
    }
}

impl From<reqwest::Error> for GistError {
    fn from(e: reqwest::Error) -> Self {
        GistError::Network(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

/// HTTP-клиент для GitHub Gist API
pub struct GistApiClient {
    client: reqwest::Client,
    api_base: String,
    gist_id: String,
    token: String,
    file_name: String,
}

impl GistApiClient {
    pub fn new(config: &GistConfig) -> Result<Self, GistError> {
        if !config.has_credentials() {
            return Err(GistError::MissingCredentials);
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            gist_id: config.gist_id.trim().to_string(),
            token: config.token.trim().to_string(),
            file_name: config.file_name.clone(),
        })
    }

    fn gist_url(&self) -> String {
        format!("{}/gists/{}", self.api_base, self.gist_id)
    }

    /// Содержимое файла из gist: GET /gists/{id}
    pub async fn fetch_file(&self, file_name: &str) -> Result<String, GistError> {
        let url = self.gist_url();
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", ACCEPT)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gist API response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gist fetch failed with status {}: {}", status, body);
            return Err(GistError::from_status(status, body));
        }

        let gist: GistResponse = response
            .json()
            .await
            .map_err(|e| GistError::Network(format!("unexpected gist payload: {}", e)))?;
        let file = gist
            .files
            .get(file_name)
            .ok_or_else(|| GistError::FileMissing(file_name.to_string()))?;

        // Большие файлы приходят обрезанными, полный текст по raw_url
        let content = match (&file.raw_url, file.truncated) {
            (Some(raw_url), true) => self.fetch_raw(raw_url).await?,
            _ => file.content.clone().unwrap_or_default(),
        };

        if content.trim().is_empty() {
            return Err(GistError::EmptyContent);
        }
        Ok(content)
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String, GistError> {
        tracing::debug!("GET {} (truncated file)", raw_url);
        let response = self
            .client
            .get(raw_url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GistError::from_status(status, body));
        }
        Ok(response.text().await?)
    }

    /// Перезапись файла целиком: PATCH /gists/{id}
    pub async fn update_file(&self, file_name: &str, content: &str) -> Result<(), GistError> {
        let url = self.gist_url();
        let body = serde_json::json!({
            "files": {
                file_name: { "content": content }
            }
        });
        tracing::debug!("PATCH {} ({} bytes)", url, content.len());

        let response = self
            .client
            .patch(&url)
            .header("Accept", ACCEPT)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gist API response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gist update failed with status {}: {}", status, body);
            return Err(GistError::from_status(status, body));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for GistApiClient {
    async fn fetch(&self) -> Result<String, GistError> {
        self.fetch_file(&self.file_name).await
    }

    async fn store(&self, content: &str) -> Result<(), GistError> {
        self.update_file(&self.file_name, content).await
    }

    fn describe(&self) -> String {
        format!("gist {} / {}", self.gist_id, self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_credentials() {
        let config = GistConfig::default();
        assert!(matches!(
            GistApiClient::new(&config),
            Err(GistError::MissingCredentials)
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GistError::from_status(StatusCode::NOT_FOUND, String::new()),
            GistError::NotFound
        );
        assert_eq!(
            GistError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".into()),
            GistError::Unprocessable("bad".into())
        );
        assert_eq!(
            GistError::from_status(StatusCode::BAD_GATEWAY, "x".into()),
            GistError::Http {
                status: 502,
                body: "x".into()
            }
        );
    }

    #[test]
    fn test_gist_payload_parsing() {
        let raw = r#"{"id":"1","files":{"prompt_library.json":{"content":"{}","truncated":false,"raw_url":"https://x"}}}"#;
        let gist: GistResponse = serde_json::from_str(raw).unwrap();
        let file = &gist.files["prompt_library.json"];
        assert_eq!(file.content.as_deref(), Some("{}"));
        assert!(!file.truncated);
    }

    #[test]
    fn test_user_messages_mention_status() {
        assert!(GistError::Unauthorized.user_message().contains("401"));
        assert!(GistError::NotFound.user_message().contains("404"));
    }
}
