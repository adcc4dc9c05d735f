//! Placeholder substitution for use-case templates
//!
//! Two conventions live side by side in a template:
//! - `{name}` is filled from the generator form;
//! - `{{name}}` survives rendering as `{name}` so that a downstream model
//!   (or another template) can fill it later.
//!
//! Substitution is literal: every occurrence of `{name}` is replaced, there is
//! no tokenizer. Longer names are substituted first.

use crate::domain::a001_prompt_library::aggregate::VariableValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors of the strict formatting path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("No value supplied for placeholder {{{0}}}")]
    MissingKey(String),

    #[error("Unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
}

/// Render a template with already stringified values.
///
/// Unknown placeholders are left as they are, `{{`/`}}` are collapsed to single
/// braces afterwards. Never fails.
///
/// # Example
/// ```rust
/// use std::collections::BTreeMap;
/// use contracts::shared::placeholder::render_template;
///
/// let mut values = BTreeMap::new();
/// values.insert("name".to_string(), "Al".to_string());
/// assert_eq!(render_template("Hi {name}, {{raw}}", &values), "Hi Al, {raw}");
/// ```
pub fn render_template(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut keys: Vec<&String> = values.keys().filter(|k| !k.is_empty()).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut rendered = template.to_string();
    for key in keys {
        let placeholder = format!("{{{}}}", key);
        if rendered.contains(&placeholder) {
            rendered = rendered.replace(&placeholder, &values[key]);
        }
    }

    collapse_double_braces(&rendered)
}

/// Render a template with typed form values
pub fn render_with_values(template: &str, values: &BTreeMap<String, VariableValue>) -> String {
    let stringified: BTreeMap<String, String> = values
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect();
    render_template(template, &stringified)
}

/// Strict formatting: every `{name}` must have a value, `{{` and `}}` are
/// escapes, any other brace is an error.
pub fn format_strict(
    template: &str,
    values: &BTreeMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnbalancedBrace(idx)),
                        _ => name.push(c),
                    }
                }
                if !closed {
                    return Err(TemplateError::UnbalancedBrace(idx));
                }
                let value = values
                    .get(name.trim())
                    .ok_or_else(|| TemplateError::MissingKey(name.clone()))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnbalancedBrace(idx));
                }
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Ordered, de-duplicated list of single-brace placeholder names.
///
/// Double-brace spans are pass-through text and are not reported.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let bytes = template.as_bytes();
    let mut names: Vec<String> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'{') {
            match template[i + 2..].find("}}") {
                Some(end) => {
                    i += 2 + end + 2;
                    continue;
                }
                None => break,
            }
        }
        match template[i + 1..].find('}') {
            Some(end) => {
                let name = &template[i + 1..i + 1 + end];
                if is_placeholder_name(name) && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                i += end + 2;
            }
            None => break,
        }
    }

    names
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn collapse_double_braces(text: &str) -> String {
    text.replace("{{", "{").replace("}}", "}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_longer_names_substituted_first() {
        let v = values(&[("name", "Al"), ("name_full", "ALF-1")]);
        assert_eq!(
            render_template("Hello {name}, order {name_full}", &v),
            "Hello Al, order ALF-1"
        );
    }

    #[test]
    fn test_double_braces_collapse_when_not_supplied() {
        let v = BTreeMap::new();
        assert_eq!(render_template("Result: {{score}}", &v), "Result: {score}");
    }

    #[test]
    fn test_unknown_placeholders_left_verbatim() {
        let v = values(&[("topic", "Rust")]);
        assert_eq!(
            render_template("About {topic} for {audience}", &v),
            "About Rust for {audience}"
        );
    }

    #[test]
    fn test_keys_absent_from_template_change_nothing() {
        let v = values(&[("unused", "x"), ("other", "y")]);
        let template = "Plain text with {kept}";
        assert_eq!(render_template(template, &v), template);
    }

    #[test]
    fn test_literal_replacement_reaches_inside_double_braces() {
        // `{{score}}` contains the literal `{score}`
        let v = values(&[("score", "42")]);
        assert_eq!(render_template("Result: {{score}}", &v), "Result: {42}");
    }

    #[test]
    fn test_render_with_typed_values() {
        let mut v = BTreeMap::new();
        v.insert("words".to_string(), VariableValue::Number(150.0));
        v.insert("ratio".to_string(), VariableValue::Number(0.5));
        v.insert(
            "launch".to_string(),
            VariableValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
        );
        assert_eq!(
            render_with_values("{words} words, {ratio}, on {launch}", &v),
            "150 words, 0.5, on 2024-03-15"
        );
    }

    #[test]
    fn test_format_strict_success_and_escapes() {
        let v = values(&[("name", "Al")]);
        assert_eq!(
            format_strict("Hi {name}, keep {{this}}", &v).unwrap(),
            "Hi Al, keep {this}"
        );
    }

    #[test]
    fn test_format_strict_missing_key() {
        let v = values(&[("name", "Al")]);
        assert_eq!(
            format_strict("Hi {name}, {missing}", &v),
            Err(TemplateError::MissingKey("missing".to_string()))
        );
    }

    #[test]
    fn test_format_strict_unbalanced() {
        let v = BTreeMap::new();
        assert_eq!(
            format_strict("oops }", &v),
            Err(TemplateError::UnbalancedBrace(5))
        );
        assert_eq!(
            format_strict("open { never closed", &v),
            Err(TemplateError::UnbalancedBrace(5))
        );
    }

    #[test]
    fn test_extract_placeholders() {
        assert_eq!(
            extract_placeholders("{a} and {b} then {a}, {{skip}} and { not one }"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(extract_placeholders("no braces here").is_empty());
        assert_eq!(extract_placeholders("tail {x"), Vec::<String>::new());
    }
}
