use super::request::{AssistantMode, MetaPromptRequest};
use crate::shared::placeholder::render_template;
use serde_json::Value;
use std::collections::BTreeMap;

/// Used when `templates/create_prompt.md` cannot be read
pub const FALLBACK_CREATE_TEMPLATE: &str = r#"You are an expert prompt engineer.
Design a reusable prompt template for the family "{family}" named "{use_case_name}".

Objective: {objective}
Expected output: {expected_output}

Mark every value the user fills in a form as a placeholder in single braces, e.g. {{customer_name}}.
Answer with a single JSON object in this shape:
{{"{use_case_name}": {{"template": "...", "variables": [{{"name": "...", "label": "...", "type": "text|textarea|date|number|select", "default": "...", "options": []}}], "tags": []}}}}
"#;

/// Used when `templates/improve_prompt.md` cannot be read
pub const FALLBACK_IMPROVE_TEMPLATE: &str = r#"You are an expert prompt engineer.
Improve the prompt template "{use_case_name}" of the family "{family}".

Current configuration:
{current_config}

Improvement goals: {improvement_goals}
Expected output: {expected_output}

Keep existing variable names where possible. Form placeholders use single braces, e.g. {{topic}}.
Answer with a single JSON object in this shape:
{{"{use_case_name}": {{"template": "...", "variables": [...], "tags": []}}}}
"#;

pub fn fallback_template(mode: AssistantMode) -> &'static str {
    match mode {
        AssistantMode::CreateNew => FALLBACK_CREATE_TEMPLATE,
        AssistantMode::ImproveExisting => FALLBACK_IMPROVE_TEMPLATE,
    }
}

/// Заполняет шаблон мета-промпта данными формы ассистента
pub fn build_meta_prompt(template_text: &str, request: &MetaPromptRequest) -> String {
    let current_config = request
        .current_config
        .as_ref()
        .and_then(|c| serde_json::to_string_pretty(c).ok())
        .unwrap_or_else(|| "{}".to_string());

    let values: BTreeMap<String, String> = [
        ("family", request.family.trim().to_string()),
        ("use_case_name", request.use_case_name.trim().to_string()),
        ("objective", request.objective.trim().to_string()),
        ("expected_output", request.expected_output.trim().to_string()),
        ("current_config", current_config),
        ("improvement_goals", request.improvement_goals.trim().to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    render_template(template_text, &values)
}

/// Ищет JSON-объект в ответе модели: сначала блок ```json, затем
/// внешние фигурные скобки.
pub fn extract_json_object(text: &str) -> Option<Value> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str(body[..end].trim()) {
                return Some(value);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> MetaPromptRequest {
        MetaPromptRequest {
            family: "Sales".into(),
            use_case_name: "Cold email".into(),
            objective: "Write a first-touch email".into(),
            expected_output: "Plain text email".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_prompt_fills_form_and_keeps_double_braces() {
        let prompt = build_meta_prompt(FALLBACK_CREATE_TEMPLATE, &request());
        assert!(prompt.contains("family \"Sales\" named \"Cold email\""));
        assert!(prompt.contains("Objective: Write a first-touch email"));
        assert!(prompt.contains("e.g. {customer_name}"));
        assert!(prompt.contains(r#"{"Cold email": {"template""#));
    }

    #[test]
    fn test_improve_prompt_includes_current_config() {
        let mut req = request();
        req.mode = AssistantMode::ImproveExisting;
        req.current_config = Some(json!({ "template": "Hi {name}" }));
        req.improvement_goals = "shorter".into();

        let prompt = build_meta_prompt(fallback_template(req.mode), &req);
        assert!(prompt.contains("\"template\": \"Hi {name}\""));
        assert!(prompt.contains("Improvement goals: shorter"));

        req.current_config = None;
        let prompt = build_meta_prompt(FALLBACK_IMPROVE_TEMPLATE, &req);
        assert!(prompt.contains("Current configuration:\n{}\n"));
    }

    #[test]
    fn test_extract_from_fenced_block() {
        let reply = "Here you go:\n```json\n{\"A\": {\"template\": \"x\"}}\n```\nEnjoy {not json}";
        assert_eq!(
            extract_json_object(reply),
            Some(json!({"A": {"template": "x"}}))
        );
    }

    #[test]
    fn test_extract_from_braces_and_failures() {
        assert_eq!(
            extract_json_object("Result: {\"B\": {\"template\": \"y\"}} done"),
            Some(json!({"B": {"template": "y"}}))
        );
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} broken {"), None);
    }
}
