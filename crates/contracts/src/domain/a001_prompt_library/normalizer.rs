//! Нормализация документа библиотеки шаблонов
//!
//! Документ приходит из внешнего JSON (gist, ручная вставка, форма редактора)
//! и может содержать значения не тех типов: числа строками, даты строками,
//! высоту textarea меньше минимальной и т.п. Здесь всё приводится к
//! типизированной модели. Обратное преобразование (`to_persisted`) даёт
//! чистый JSON для сохранения.

use super::aggregate::{
    PromptLibrary, UseCaseConfig, VariableSpec, VariableType, VariableValue,
    DEFAULT_TEXTAREA_HEIGHT, MIN_TEXTAREA_HEIGHT,
};
use crate::domain::common::EntityMetadata;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// Результат нормализации: библиотека + предупреждения о потерянных данных
#[derive(Debug, Clone)]
pub struct Normalized {
    pub library: PromptLibrary,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Document root must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Нормализация всего документа.
///
/// Повреждённые семейства и use case (не объекты) отбрасываются
/// с предупреждением, это не ошибка.
pub fn normalize_document(raw: &Value) -> Result<Normalized, NormalizeError> {
    let root = raw
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(json_type_name(raw)))?;

    let mut library = PromptLibrary::new();
    let mut warnings = Vec::new();

    for (family_name, family_value) in root {
        let Some(entries) = family_value.as_object() else {
            warnings.push(format!(
                "Family '{}' is {} instead of an object, dropped",
                family_name,
                json_type_name(family_value)
            ));
            continue;
        };

        let family = library.families.entry(family_name.clone()).or_default();
        for (use_case_name, use_case_value) in entries {
            let Some(fields) = use_case_value.as_object() else {
                warnings.push(format!(
                    "{} / {}: {} instead of an object, dropped",
                    family_name,
                    use_case_name,
                    json_type_name(use_case_value)
                ));
                continue;
            };
            let (config, entry_warnings) = normalize_use_case(fields);
            warnings.extend(
                entry_warnings
                    .into_iter()
                    .map(|w| format!("{} / {}: {}", family_name, use_case_name, w)),
            );
            family.insert(use_case_name.clone(), config);
        }
    }

    Ok(Normalized { library, warnings })
}

/// Нормализация одного use case (общая точка для загрузки, редактора и вставки JSON)
pub fn normalize_use_case(fields: &Map<String, Value>) -> (UseCaseConfig, Vec<String>) {
    let mut warnings = Vec::new();

    let template = fields.get("template").map(coerce_string).unwrap_or_default();

    let variables = match fields.get("variables") {
        Some(Value::Array(items)) => normalize_variables(items, &mut warnings),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warnings.push(format!(
                "'variables' is {} instead of a list, ignored",
                json_type_name(other)
            ));
            Vec::new()
        }
    };

    let created_at = fields
        .get("created_at")
        .and_then(coerce_timestamp)
        .unwrap_or_else(Utc::now);
    let updated_at = fields
        .get("updated_at")
        .and_then(coerce_timestamp)
        .unwrap_or(created_at);

    let config = UseCaseConfig {
        template,
        variables,
        tags: coerce_tags(fields.get("tags")),
        usage_count: fields.get("usage_count").map(coerce_count).unwrap_or(0),
        metadata: EntityMetadata::with_timestamps(created_at, updated_at),
    };

    (config, warnings)
}

fn normalize_variables(items: &[Value], warnings: &mut Vec<String>) -> Vec<VariableSpec> {
    let mut variables: Vec<VariableSpec> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(variable) = normalize_variable(index, item, warnings) else {
            continue;
        };
        if variables.iter().any(|v| v.name == variable.name) {
            warnings.push(format!(
                "duplicate variable '{}' dropped (first definition kept)",
                variable.name
            ));
            continue;
        }
        variables.push(variable);
    }
    variables
}

fn normalize_variable(index: usize, raw: &Value, warnings: &mut Vec<String>) -> Option<VariableSpec> {
    let Some(obj) = raw.as_object() else {
        warnings.push(format!("variable #{} is not an object, dropped", index + 1));
        return None;
    };

    let name = obj
        .get("name")
        .map(coerce_string)
        .unwrap_or_default()
        .trim()
        .to_string();
    if name.is_empty() {
        warnings.push(format!("variable #{} has no name, dropped", index + 1));
        return None;
    }

    let label = obj
        .get("label")
        .map(coerce_string)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| name.clone());

    let mut var_type = match obj.get("type").and_then(Value::as_str) {
        None => VariableType::Text,
        Some(t) => VariableType::from_str(t).unwrap_or_else(|e| {
            warnings.push(format!("variable '{}': {}, treated as text", name, e));
            VariableType::Text
        }),
    };

    let options = coerce_options(obj.get("options"));
    if var_type == VariableType::Select && options.is_empty() {
        warnings.push(format!(
            "variable '{}': select without options, treated as text",
            name
        ));
        var_type = VariableType::Text;
    }

    let raw_default = obj.get("default");
    let mut min = None;
    let mut max = None;
    let mut step = None;
    let mut height = None;

    let default = match var_type {
        VariableType::Number => {
            min = obj.get("min").and_then(coerce_f64);
            max = obj.get("max").and_then(coerce_f64);
            step = obj.get("step").and_then(coerce_f64);
            let value = raw_default
                .and_then(coerce_f64)
                .unwrap_or_else(|| min.unwrap_or(0.0));
            VariableValue::Number(value)
        }
        VariableType::Date => VariableValue::Date(
            raw_default
                .and_then(coerce_date)
                .unwrap_or_else(|| Utc::now().date_naive()),
        ),
        VariableType::Select => {
            let chosen = raw_default
                .map(coerce_string)
                .filter(|d| options.contains(d))
                .unwrap_or_else(|| options[0].clone());
            VariableValue::Text(chosen)
        }
        VariableType::Textarea => {
            height = Some(coerce_height(obj.get("height")));
            VariableValue::Text(raw_default.map(coerce_string).unwrap_or_default())
        }
        VariableType::Text => VariableValue::Text(raw_default.map(coerce_string).unwrap_or_default()),
    };

    let help = obj
        .get("help")
        .map(coerce_string)
        .filter(|h| !h.trim().is_empty());

    Some(VariableSpec {
        name,
        label,
        var_type,
        default,
        options: if var_type == VariableType::Select {
            options
        } else {
            Vec::new()
        },
        min,
        max,
        step,
        height,
        help,
    })
}

/// Обратное преобразование перед сохранением: только "плоские" JSON-типы
pub fn to_persisted(library: &PromptLibrary) -> Value {
    let mut root = Map::new();
    for (family_name, family) in &library.families {
        let entries: Map<String, Value> = family
            .iter()
            .map(|(name, config)| (name.clone(), use_case_to_persisted(config)))
            .collect();
        root.insert(family_name.clone(), Value::Object(entries));
    }
    Value::Object(root)
}

pub fn use_case_to_persisted(config: &UseCaseConfig) -> Value {
    let variables: Vec<Value> = config.variables.iter().map(variable_to_persisted).collect();
    json!({
        "template": config.template,
        "variables": variables,
        "tags": config.tags.iter().collect::<Vec<_>>(),
        "usage_count": config.usage_count,
        "created_at": config.metadata.created_at.to_rfc3339(),
        "updated_at": config.metadata.updated_at.to_rfc3339(),
    })
}

fn variable_to_persisted(variable: &VariableSpec) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), json!(variable.name));
    obj.insert("label".into(), json!(variable.label));
    obj.insert("type".into(), json!(variable.var_type.as_str()));

    let default = match &variable.default {
        VariableValue::Text(s) => json!(s),
        VariableValue::Number(n) => json!(*n),
        VariableValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
    };
    obj.insert("default".into(), default);

    if !variable.options.is_empty() {
        obj.insert("options".into(), json!(variable.options));
    }
    for (key, bound) in [("min", variable.min), ("max", variable.max), ("step", variable.step)] {
        if let Some(value) = bound {
            obj.insert(key.into(), json!(value));
        }
    }
    if variable.var_type == VariableType::Textarea {
        obj.insert("height".into(), json!(variable.effective_height()));
    }
    if let Some(help) = &variable.help {
        obj.insert("help".into(), json!(help));
    }
    Value::Object(obj)
}

// ============================================================================
// Coercion helpers
// ============================================================================

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn coerce_height(value: Option<&Value>) -> u32 {
    match value.and_then(coerce_f64) {
        Some(h) if h < MIN_TEXTAREA_HEIGHT as f64 => MIN_TEXTAREA_HEIGHT,
        Some(h) => h.round().min(u32::MAX as f64) as u32,
        None => DEFAULT_TEXTAREA_HEIGHT,
    }
}

fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn coerce_tags(value: Option<&Value>) -> BTreeSet<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Варианты select: список или строка через запятую; пустые и повторы убираются
pub fn coerce_options(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    let mut options: Vec<String> = Vec::with_capacity(raw.len());
    for option in raw.into_iter().map(|o| o.trim().to_string()) {
        if !option.is_empty() && !options.contains(&option) {
            options.push(option);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_prompt_library::defaults::default_library;

    fn normalize_one(raw: Value) -> (UseCaseConfig, Vec<String>) {
        normalize_use_case(raw.as_object().unwrap())
    }

    fn textarea_height(height: Value) -> u32 {
        let (config, _) = normalize_one(json!({
            "template": "{notes}",
            "variables": [{"name": "notes", "type": "textarea", "height": height}]
        }));
        config.variables[0].height.unwrap()
    }

    #[test]
    fn test_textarea_height_always_valid() {
        assert_eq!(textarea_height(json!(-5)), 68);
        assert_eq!(textarea_height(json!(0)), 68);
        assert_eq!(textarea_height(json!(40)), 68);
        assert_eq!(textarea_height(json!(150)), 150);
        assert_eq!(textarea_height(json!("200")), 200);
        assert_eq!(textarea_height(json!("tall")), 100);
        assert_eq!(textarea_height(Value::Null), 100);

        let (config, _) = normalize_one(json!({
            "template": "{notes}",
            "variables": [{"name": "notes", "type": "textarea"}]
        }));
        assert_eq!(config.variables[0].height, Some(100));
    }

    #[test]
    fn test_numbers_and_dates_coerced() {
        let (config, warnings) = normalize_one(json!({
            "template": "{count} {when}",
            "variables": [
                {"name": "count", "type": "number", "default": "12", "min": 1, "max": "100", "step": "oops"},
                {"name": "when", "type": "date", "default": "2024-05-01T10:00:00"}
            ],
            "usage_count": "7"
        }));
        assert!(warnings.is_empty());
        let count = &config.variables[0];
        assert_eq!(count.default, VariableValue::Number(12.0));
        assert_eq!(count.min, Some(1.0));
        assert_eq!(count.max, Some(100.0));
        assert_eq!(count.step, None);
        assert_eq!(
            config.variables[1].default,
            VariableValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        assert_eq!(config.usage_count, 7);
    }

    #[test]
    fn test_unparsable_number_default_falls_back_to_min() {
        let (config, _) = normalize_one(json!({
            "template": "",
            "variables": [{"name": "n", "type": "number", "default": "many", "min": 5}]
        }));
        assert_eq!(config.variables[0].default, VariableValue::Number(5.0));
    }

    #[test]
    fn test_select_rules() {
        let (config, warnings) = normalize_one(json!({
            "template": "{tone} {mood}",
            "variables": [
                {"name": "tone", "type": "select", "options": ["formal", "casual"], "default": "loud"},
                {"name": "mood", "type": "select"}
            ]
        }));
        assert_eq!(config.variables[0].default, VariableValue::Text("formal".into()));
        assert_eq!(config.variables[1].var_type, VariableType::Text);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_variables_without_name_and_duplicates_dropped() {
        let (config, warnings) = normalize_one(json!({
            "template": "{a}",
            "variables": [{"name": "a"}, {"label": "nameless"}, "junk", {"name": "a", "type": "number"}],
            "tags": "x, y ,,"
        }));
        assert_eq!(config.variables.len(), 1);
        assert_eq!(config.variables[0].label, "a");
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            config.tags.iter().cloned().collect::<Vec<_>>(),
            vec!["x".to_string(), "y".to_string()]
        );
    }

    #[test]
    fn test_corrupt_entries_dropped_not_fatal() {
        let raw = json!({
            "Good": {"Ok": {"template": "hi"}, "Broken": "not an object"},
            "Bad": ["not", "a", "mapping"]
        });
        let normalized = normalize_document(&raw).unwrap();
        assert_eq!(normalized.library.family_names(), vec!["Good".to_string()]);
        assert!(normalized.library.use_case("Good", "Ok").is_some());
        assert!(normalized.library.use_case("Good", "Broken").is_none());
        assert_eq!(normalized.warnings.len(), 2);
    }

    #[test]
    fn test_root_must_be_object() {
        assert_eq!(
            normalize_document(&json!([1, 2])).unwrap_err(),
            NormalizeError::NotAnObject("a list")
        );
    }

    #[test]
    fn test_round_trip_preserves_library() {
        let library = default_library();
        let persisted = to_persisted(&library);
        let restored = normalize_document(&persisted).unwrap();
        assert!(restored.warnings.is_empty());
        assert_eq!(restored.library, library);
    }

    #[test]
    fn test_persisted_form_is_plain_json() {
        let library = default_library();
        let persisted = to_persisted(&library);
        for family in persisted.as_object().unwrap().values() {
            for config in family.as_object().unwrap().values() {
                for variable in config["variables"].as_array().unwrap() {
                    match variable["type"].as_str().unwrap() {
                        "number" => assert!(variable["default"].is_f64()),
                        "date" => assert!(NaiveDate::parse_from_str(
                            variable["default"].as_str().unwrap(),
                            "%Y-%m-%d"
                        )
                        .is_ok()),
                        "textarea" => assert!(variable["height"].as_u64().unwrap() >= 68),
                        _ => assert!(variable["default"].is_string()),
                    }
                }
            }
        }
    }

    #[test]
    fn test_naive_timestamps_accepted() {
        let (config, _) = normalize_one(json!({
            "template": "",
            "created_at": "2024-01-02 03:04:05",
            "updated_at": "2024-01-03T03:04:05.250"
        }));
        assert_eq!(config.metadata.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert_eq!(
            config.metadata.updated_at.to_rfc3339(),
            "2024-01-03T03:04:05.250+00:00"
        );
    }
}
