//! Use case editor - Model Layer
//!
//! Form values are kept as strings while the user types; they are turned
//! into the persisted JSON shape only on save. The backend runs the same
//! normalizer, so `preview` shows exactly what will be stored.

use contracts::domain::a001_prompt_library::aggregate::{
    PlaceholderReport, UseCaseConfig, VariableSpec, VariableType,
};
use contracts::domain::a001_prompt_library::normalizer::normalize_use_case;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// Одна строка таблицы переменных
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableForm {
    pub name: String,
    pub label: String,
    pub var_type: String,
    pub default_value: String,
    /// По одному варианту на строку
    pub options: String,
    pub min: String,
    pub max: String,
    pub step: String,
    pub height: String,
    pub help: String,
}

fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl VariableForm {
    pub fn from_spec(spec: &VariableSpec) -> Self {
        Self {
            name: spec.name.clone(),
            label: spec.label.clone(),
            var_type: spec.var_type.as_str().to_string(),
            default_value: spec.default.to_string(),
            options: spec.options.join("\n"),
            min: opt_number(spec.min),
            max: opt_number(spec.max),
            step: opt_number(spec.step),
            height: spec.height.map(|h| h.to_string()).unwrap_or_default(),
            help: spec.help.clone().unwrap_or_default(),
        }
    }

    pub fn var_type(&self) -> VariableType {
        VariableType::from_str(&self.var_type).unwrap_or_default()
    }

    pub fn to_json(&self) -> Value {
        let var_type = self.var_type();
        let mut obj = Map::new();
        obj.insert("name".into(), json!(self.name.trim()));
        obj.insert("label".into(), json!(self.label.trim()));
        obj.insert("type".into(), json!(var_type.as_str()));

        let default = match var_type {
            VariableType::Number => self
                .default_value
                .trim()
                .parse::<f64>()
                .map(|n| json!(n))
                .unwrap_or_else(|_| json!(self.default_value.trim())),
            _ => json!(self.default_value),
        };
        obj.insert("default".into(), default);

        match var_type {
            VariableType::Select => {
                obj.insert("options".into(), json!(parse_options(&self.options)));
            }
            VariableType::Number => {
                for (key, raw) in [("min", &self.min), ("max", &self.max), ("step", &self.step)] {
                    if let Ok(n) = raw.trim().parse::<f64>() {
                        obj.insert(key.into(), json!(n));
                    }
                }
            }
            VariableType::Textarea => {
                if !self.height.trim().is_empty() {
                    obj.insert("height".into(), json!(self.height.trim()));
                }
            }
            VariableType::Text | VariableType::Date => {}
        }

        if !self.help.trim().is_empty() {
            obj.insert("help".into(), json!(self.help.trim()));
        }
        Value::Object(obj)
    }
}

/// Теги через запятую, без пустых и повторов
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Варианты select: по одному на строку
pub fn parse_options(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.lines()
        .map(str::trim)
        .filter(|o| !o.is_empty() && seen.insert(o.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn build_config(template: &str, variables: &[VariableForm], tags: &str) -> Value {
    json!({
        "template": template,
        "variables": variables.iter().map(VariableForm::to_json).collect::<Vec<_>>(),
        "tags": parse_tags(tags),
    })
}

/// Результат нормализации формы: что будет сохранено и что изменится
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPreview {
    pub config: Option<UseCaseConfig>,
    pub warnings: Vec<String>,
    pub report: PlaceholderReport,
}

pub fn preview(config: &Value) -> FormPreview {
    let Some(fields) = config.as_object() else {
        return FormPreview::default();
    };
    let (normalized, warnings) = normalize_use_case(fields);
    let report = normalized.placeholder_report();
    FormPreview {
        config: Some(normalized),
        warnings,
        report,
    }
}

/// Ошибки, при которых сохранять нельзя
pub fn validate_form(name: &str, template: &str, variables: &[VariableForm]) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Use case name cannot be empty".into());
    }
    if template.trim().is_empty() {
        return Err("Template cannot be empty".into());
    }
    let mut names = BTreeSet::new();
    for (index, variable) in variables.iter().enumerate() {
        let var_name = variable.name.trim();
        if var_name.is_empty() {
            return Err(format!("Variable #{} has no name", index + 1));
        }
        if !names.insert(var_name.to_string()) {
            return Err(format!("Variable '{}' is defined twice", var_name));
        }
        if variable.var_type() == VariableType::Select && parse_options(&variable.options).is_empty() {
            return Err(format!("Select variable '{}' needs at least one option", var_name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_prompt_library::aggregate::{VariableValue, MIN_TEXTAREA_HEIGHT};

    fn text_var(name: &str) -> VariableForm {
        VariableForm {
            name: name.into(),
            var_type: "text".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_tags_dedups_and_trims() {
        assert_eq!(parse_tags(" sales, ,email,sales "), vec!["email", "sales"]);
    }

    #[test]
    fn test_parse_options_keeps_order() {
        assert_eq!(parse_options("formal\n\ncasual\nformal\n"), vec!["formal", "casual"]);
    }

    #[test]
    fn test_number_variable_json() {
        let var = VariableForm {
            name: "words".into(),
            var_type: "number".into(),
            default_value: "150".into(),
            min: "50".into(),
            max: "not a number".into(),
            ..Default::default()
        };
        let json = var.to_json();
        assert_eq!(json["default"], json!(150.0));
        assert_eq!(json["min"], json!(50.0));
        assert!(json.get("max").is_none());
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_preview_clamps_height_and_reports_placeholders() {
        let vars = vec![
            text_var("topic"),
            VariableForm {
                name: "notes".into(),
                var_type: "textarea".into(),
                height: "10".into(),
                ..Default::default()
            },
        ];
        let config = build_config("Write about {topic} for {audience}", &vars, "blog");
        let result = preview(&config);

        let normalized = result.config.unwrap();
        assert_eq!(normalized.variables[1].height, Some(MIN_TEXTAREA_HEIGHT));
        assert_eq!(result.report.unused_variables, vec!["notes"]);
        assert_eq!(result.report.undeclared_placeholders, vec!["audience"]);
    }

    #[test]
    fn test_form_roundtrip_through_spec() {
        let spec = VariableSpec::new("tone", "Tone", VariableType::Select)
            .with_options(&["formal", "casual"])
            .with_default(VariableValue::Text("casual".into()));
        let form = VariableForm::from_spec(&spec);
        assert_eq!(form.options, "formal\ncasual");

        let config = build_config("{tone}", &[form], "");
        let normalized = preview(&config).config.unwrap();
        assert_eq!(normalized.variables[0], spec);
    }

    #[test]
    fn test_validate_form() {
        assert!(validate_form("", "x", &[]).is_err());
        assert!(validate_form("a", "  ", &[]).is_err());
        assert!(validate_form("a", "{x}", &[text_var("x"), text_var("x")]).is_err());

        let select = VariableForm {
            name: "tone".into(),
            var_type: "select".into(),
            ..Default::default()
        };
        let err = validate_form("a", "{tone}", &[select]).unwrap_err();
        assert!(err.contains("tone"));
        assert!(validate_form("a", "{x}", &[text_var("x")]).is_ok());
    }
}
