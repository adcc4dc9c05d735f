use crate::shared::config::{resolve_path, TemplatesConfig};
use contracts::usecases::u503_prompt_assistant::meta_prompt::fallback_template;
use contracts::usecases::u503_prompt_assistant::{AssistantMode, TemplateSource};
use std::path::Path;

/// Markdown-шаблон мета-промпта; при отсутствии файла используется встроенный
pub fn load_template(templates: &TemplatesConfig, mode: AssistantMode) -> (String, TemplateSource) {
    let configured = match mode {
        AssistantMode::CreateNew => &templates.create_prompt,
        AssistantMode::ImproveExisting => &templates.improve_prompt,
    };
    let path = resolve_path(configured);
    load_from(&path, mode)
}

pub fn load_from(path: &Path, mode: AssistantMode) -> (String, TemplateSource) {
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => (text, TemplateSource::File),
        Ok(_) => {
            tracing::warn!("Template {} is empty, using built-in", path.display());
            (fallback_template(mode).to_string(), TemplateSource::Builtin)
        }
        Err(e) => {
            tracing::warn!(
                "Cannot read template {}: {}, using built-in",
                path.display(),
                e
            );
            (fallback_template(mode).to_string(), TemplateSource::Builtin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back() {
        let (text, source) = load_from(
            Path::new("definitely/missing/create_prompt.md"),
            AssistantMode::CreateNew,
        );
        assert_eq!(source, TemplateSource::Builtin);
        assert!(text.contains("{objective}"));
    }

    #[test]
    fn test_file_is_used() {
        let path = std::env::temp_dir().join(format!("improve_prompt_{}.md", std::process::id()));
        std::fs::write(&path, "Improve {use_case_name}").unwrap();

        let (text, source) = load_from(&path, AssistantMode::ImproveExisting);
        assert_eq!(source, TemplateSource::File);
        assert_eq!(text, "Improve {use_case_name}");

        std::fs::remove_file(&path).ok();
    }
}
