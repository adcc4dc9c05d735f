use super::response::InjectReport;
use crate::domain::a001_prompt_library::aggregate::{PromptLibrary, VariableType};
use crate::domain::a001_prompt_library::normalizer::{coerce_options, normalize_use_case};
use crate::domain::common::EntityMetadata;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("Family name cannot be empty")]
    EmptyFamily,

    #[error("Payload must be a JSON object of use cases")]
    NotAnObject,
}

/// Вставка use case из JSON-объекта в семейство.
///
/// Каждая запись проверяется отдельно: ошибочные попадают в `failures`,
/// корректные добавляются. Семейство создаётся только если добавлена хотя
/// бы одна запись.
pub fn inject_use_cases(
    library: &mut PromptLibrary,
    family: &str,
    payload: &Value,
    overwrite: bool,
) -> Result<InjectReport, InjectError> {
    let family = family.trim();
    if family.is_empty() {
        return Err(InjectError::EmptyFamily);
    }
    let entries = payload.as_object().ok_or(InjectError::NotAnObject)?;

    let mut report = InjectReport {
        family: family.to_string(),
        ..Default::default()
    };

    for (raw_name, value) in entries {
        let name = raw_name.trim();
        if name.is_empty() {
            report.failures.push("<empty name>: use case name cannot be empty".into());
            continue;
        }
        let fields = match check_entry(value) {
            Ok(fields) => fields,
            Err(reason) => {
                report.failures.push(format!("{}: {}", name, reason));
                continue;
            }
        };

        let existing = library.use_case(family, name).cloned();
        if existing.is_some() && !overwrite {
            report
                .failures
                .push(format!("{}: already exists in '{}'", name, family));
            continue;
        }

        let (mut config, warnings) = normalize_use_case(fields);
        if let Err(reason) = config.validate() {
            report.failures.push(format!("{}: {}", name, reason));
            continue;
        }
        match existing {
            Some(previous) => {
                config.usage_count = previous.usage_count;
                config.metadata = previous.metadata;
                config.touch();
            }
            None => {
                config.usage_count = 0;
                config.metadata = EntityMetadata::new();
            }
        }

        report
            .warnings
            .extend(warnings.into_iter().map(|w| format!("{}: {}", name, w)));
        library
            .families
            .entry(family.to_string())
            .or_default()
            .insert(name.to_string(), config);
        report.added.push(name.to_string());
    }

    Ok(report)
}

/// Структурная проверка записи до нормализации
fn check_entry(value: &Value) -> Result<&Map<String, Value>, String> {
    let fields = value
        .as_object()
        .ok_or_else(|| "entry must be an object".to_string())?;

    match fields.get("template") {
        None => return Err("missing 'template'".into()),
        Some(Value::String(t)) if t.trim().is_empty() => {
            return Err("'template' is empty".into())
        }
        Some(Value::String(_)) => {}
        Some(_) => return Err("'template' must be a string".into()),
    }

    let variables = match fields.get("variables") {
        None | Some(Value::Null) => return Ok(fields),
        Some(Value::Array(items)) => items,
        Some(_) => return Err("'variables' must be a list".into()),
    };

    for (index, variable) in variables.iter().enumerate() {
        let Some(spec) = variable.as_object() else {
            return Err(format!("variable #{} must be an object", index + 1));
        };
        let name = spec
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(format!("variable #{} has no name", index + 1));
        }
        let is_select = spec
            .get("type")
            .and_then(Value::as_str)
            .and_then(|t| VariableType::from_str(t).ok())
            == Some(VariableType::Select);
        let has_options = !coerce_options(spec.get("options")).is_empty();
        if is_select && !has_options {
            return Err(format!("select variable '{}' has no options", name));
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_prompt_library::defaults::default_library;
    use serde_json::json;

    #[test]
    fn test_one_valid_one_missing_template() {
        let mut library = default_library();
        let before = library.clone();
        let payload = json!({
            "Press release": {
                "template": "Announce {product}",
                "variables": [{"name": "product", "label": "Product"}]
            },
            "Broken": { "variables": [] }
        });

        let report = inject_use_cases(&mut library, "Marketing", &payload, false).unwrap();

        assert_eq!(report.added, vec!["Press release".to_string()]);
        assert_eq!(report.failures, vec!["Broken: missing 'template'".to_string()]);

        let added = library.use_case("Marketing", "Press release").unwrap();
        assert_eq!(added.usage_count, 0);
        assert_eq!(added.variables[0].name, "product");

        // остальная библиотека не изменилась
        library.delete_use_case("Marketing", "Press release").unwrap();
        assert_eq!(library, before);
    }

    #[test]
    fn test_not_an_object() {
        let mut library = PromptLibrary::new();
        assert_eq!(
            inject_use_cases(&mut library, "F", &json!(["a"]), false).unwrap_err(),
            InjectError::NotAnObject
        );
        assert_eq!(
            inject_use_cases(&mut library, " ", &json!({}), false).unwrap_err(),
            InjectError::EmptyFamily
        );
    }

    #[test]
    fn test_family_created_only_on_success() {
        let mut library = PromptLibrary::new();
        let payload = json!({ "A": "not an object", "B": { "template": 5 } });
        let report = inject_use_cases(&mut library, "Sales", &payload, false).unwrap();
        assert!(report.added.is_empty());
        assert_eq!(
            report.failures,
            vec![
                "A: entry must be an object".to_string(),
                "B: 'template' must be a string".to_string()
            ]
        );
        assert!(library.family("Sales").is_none());
    }

    #[test]
    fn test_variable_checks() {
        let mut library = PromptLibrary::new();
        let payload = json!({
            "NoName": { "template": "x", "variables": [{"label": "L"}] },
            "NoOptions": { "template": "{t}", "variables": [{"name": "t", "type": "select"}] },
            "BadList": { "template": "x", "variables": "t" },
            "Dup": { "template": "{t}", "variables": [{"name": "t"}, {"name": "t"}] }
        });
        let report = inject_use_cases(&mut library, "F", &payload, false).unwrap();
        assert_eq!(
            report.failures,
            vec![
                "BadList: 'variables' must be a list".to_string(),
                "NoName: variable #1 has no name".to_string(),
                "NoOptions: select variable 't' has no options".to_string(),
            ]
        );
        // дубликат переменной отбрасывается нормализатором с предупреждением
        assert_eq!(report.added, vec!["Dup".to_string()]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_select_options_follow_normalizer_rules() {
        let mut library = PromptLibrary::new();
        let payload = json!({
            "CommaList": {
                "template": "{tone}",
                "variables": [{"name": "tone", "type": "select", "options": "formal, friendly"}]
            },
            "BlankOnly": {
                "template": "{tone}",
                "variables": [{"name": "tone", "type": "select", "options": ["", " "]}]
            }
        });
        let report = inject_use_cases(&mut library, "F", &payload, false).unwrap();

        assert_eq!(report.added, vec!["CommaList".to_string()]);
        assert_eq!(
            report.failures,
            vec!["BlankOnly: select variable 'tone' has no options".to_string()]
        );
        let added = library.use_case("F", "CommaList").unwrap();
        assert_eq!(added.variables[0].var_type, VariableType::Select);
        assert_eq!(added.variables[0].options, vec!["formal", "friendly"]);
    }

    #[test]
    fn test_duplicate_and_overwrite() {
        let mut library = default_library();
        library.record_usage("Marketing", "Social post").unwrap();
        let created = library
            .use_case("Marketing", "Social post")
            .unwrap()
            .metadata
            .created_at;
        let payload = json!({ "Social post": { "template": "New {topic}" } });

        let report = inject_use_cases(&mut library, "Marketing", &payload, false).unwrap();
        assert_eq!(
            report.failures,
            vec!["Social post: already exists in 'Marketing'".to_string()]
        );

        let report = inject_use_cases(&mut library, "Marketing", &payload, true).unwrap();
        assert_eq!(report.added, vec!["Social post".to_string()]);
        let replaced = library.use_case("Marketing", "Social post").unwrap();
        assert_eq!(replaced.template, "New {topic}");
        assert_eq!(replaced.usage_count, 1);
        assert_eq!(replaced.metadata.created_at, created);
    }
}
