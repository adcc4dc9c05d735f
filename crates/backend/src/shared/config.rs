use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gist: GistConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Optional LLM used by the prompt assistant
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the built frontend (trunk output)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GistConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub gist_id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplatesConfig {
    #[serde(default = "default_create_prompt")]
    pub create_prompt: String,
    #[serde(default = "default_improve_prompt")]
    pub improve_prompt: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_endpoint: Option<String>,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".into()
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

fn default_file_name() -> String {
    "prompt_library.json".into()
}

fn default_create_prompt() -> String {
    "templates/create_prompt.md".into()
}

fn default_improve_prompt() -> String {
    "templates/improve_prompt.md".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> i32 {
    4096
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for GistConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            gist_id: String::new(),
            token: String::new(),
            file_name: default_file_name(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            create_prompt: default_create_prompt(),
            improve_prompt: default_improve_prompt(),
        }
    }
}

impl GistConfig {
    /// Values from the environment win over config.toml
    pub fn with_overrides(mut self, gist_id: Option<String>, token: Option<String>) -> Self {
        if let Some(id) = gist_id.filter(|v| !v.trim().is_empty()) {
            self.gist_id = id;
        }
        if let Some(token) = token.filter(|v| !v.trim().is_empty()) {
            self.token = token;
        }
        self
    }

    /// Remote sync works only with both the gist id and the token
    pub fn has_credentials(&self) -> bool {
        !self.gist_id.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
static_dir = "dist"

[gist]
api_base = "https://api.github.com"
gist_id = ""
token = ""
file_name = "prompt_library.json"

[templates]
create_prompt = "templates/create_prompt.md"
improve_prompt = "templates/improve_prompt.md"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `GIST_ID` and `GITHUB_TOKEN` from the environment override the file.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    config.gist = config.gist.with_overrides(
        std::env::var("GIST_ID").ok(),
        std::env::var("GITHUB_TOKEN").ok(),
    );
    if !config.gist.has_credentials() {
        tracing::warn!("Gist credentials are not configured, remote sync is disabled");
    }
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Resolves relative paths (templates, static dir) against the executable directory
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(candidate);
            if resolved.exists() {
                return resolved;
            }
        }
    }

    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gist.file_name, "prompt_library.json");
        assert_eq!(config.templates.create_prompt, "templates/create_prompt.md");
        assert!(config.llm.is_none());
        assert!(!config.gist.has_credentials());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gist]
            gist_id = "abc"

            [llm]
            api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.gist.api_base, "https://api.github.com");
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.max_tokens, 4096);
    }

    #[test]
    fn test_env_overrides() {
        let gist = GistConfig {
            gist_id: "from-file".into(),
            ..Default::default()
        };
        let gist = gist.with_overrides(Some("  ".into()), Some("secret".into()));
        assert_eq!(gist.gist_id, "from-file");
        assert_eq!(gist.token, "secret");
        assert!(gist.has_credentials());
    }
}
