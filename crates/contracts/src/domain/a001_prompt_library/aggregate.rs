use crate::domain::common::EntityMetadata;
use crate::shared::placeholder::extract_placeholders;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Минимальная высота textarea (px)
pub const MIN_TEXTAREA_HEIGHT: u32 = 68;
/// Высота textarea по умолчанию (px)
pub const DEFAULT_TEXTAREA_HEIGHT: u32 = 100;

/// Тип поля формы для переменной шаблона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Text,
    Textarea,
    Date,
    Number,
    Select,
}

impl VariableType {
    pub const ALL: [VariableType; 5] = [
        VariableType::Text,
        VariableType::Textarea,
        VariableType::Date,
        VariableType::Number,
        VariableType::Select,
    ];

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(VariableType::Text),
            "textarea" => Ok(VariableType::Textarea),
            "date" => Ok(VariableType::Date),
            "number" => Ok(VariableType::Number),
            "select" => Ok(VariableType::Select),
            other => Err(format!("Unknown variable type: {}", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Text => "text",
            VariableType::Textarea => "textarea",
            VariableType::Date => "date",
            VariableType::Number => "number",
            VariableType::Select => "select",
        }
    }

    /// Подпись для UI
    pub fn label(&self) -> &'static str {
        match self {
            VariableType::Text => "Text",
            VariableType::Textarea => "Multiline text",
            VariableType::Date => "Date",
            VariableType::Number => "Number",
            VariableType::Select => "Select",
        }
    }
}

/// Значение переменной (значение по умолчанию или введённое в форму)
///
/// В JSON хранится как обычное значение: строка, число или ISO-дата.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl VariableValue {
    pub fn empty_text() -> Self {
        VariableValue::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VariableValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            VariableValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl Default for VariableValue {
    fn default() -> Self {
        Self::empty_text()
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Text(s) => f.write_str(s),
            VariableValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            VariableValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for VariableValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VariableValue::Text(s) => serializer.serialize_str(s),
            VariableValue::Number(n) => serializer.serialize_f64(*n),
            VariableValue::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for VariableValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Тип переменной здесь неизвестен: даты остаются строками до нормализации
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => VariableValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => VariableValue::Text(s),
            serde_json::Value::Null => VariableValue::empty_text(),
            serde_json::Value::Bool(b) => VariableValue::Text(b.to_string()),
            other => VariableValue::Text(other.to_string()),
        })
    }
}

/// Описание переменной шаблона (одно поле формы генератора)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Имя плейсхолдера `{name}`, уникально в пределах use case
    pub name: String,

    /// Подпись поля
    #[serde(default)]
    pub label: String,

    #[serde(rename = "type", default)]
    pub var_type: VariableType,

    #[serde(default)]
    pub default: VariableValue,

    /// Варианты выбора (только для select)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Высота textarea в px (не меньше MIN_TEXTAREA_HEIGHT)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Подсказка под полем
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl VariableSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, var_type: VariableType) -> Self {
        let default = match var_type {
            VariableType::Number => VariableValue::Number(0.0),
            VariableType::Date => VariableValue::Date(chrono::Utc::now().date_naive()),
            _ => VariableValue::empty_text(),
        };
        Self {
            name: name.into(),
            label: label.into(),
            var_type,
            default,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            height: if var_type == VariableType::Textarea {
                Some(DEFAULT_TEXTAREA_HEIGHT)
            } else {
                None
            },
            help: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, VariableType::Text)
    }

    pub fn with_default(mut self, default: VariableValue) -> Self {
        self.default = default;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height.max(MIN_TEXTAREA_HEIGHT));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Подпись для формы: label или имя переменной
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }

    pub fn effective_height(&self) -> u32 {
        self.height
            .unwrap_or(DEFAULT_TEXTAREA_HEIGHT)
            .max(MIN_TEXTAREA_HEIGHT)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Variable name cannot be empty".into());
        }
        if self.var_type == VariableType::Select && self.options.is_empty() {
            return Err(format!("Select variable '{}' needs at least one option", self.name));
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("Variable '{}': min is greater than max", self.name));
            }
        }
        Ok(())
    }
}

/// Расхождения между переменными и плейсхолдерами шаблона
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderReport {
    /// Переменные, которых нет в шаблоне (подстановка не даст эффекта)
    pub unused_variables: Vec<String>,
    /// Плейсхолдеры без описанной переменной (останутся как есть)
    pub undeclared_placeholders: Vec<String>,
}

impl PlaceholderReport {
    pub fn is_clean(&self) -> bool {
        self.unused_variables.is_empty() && self.undeclared_placeholders.is_empty()
    }
}

/// Use case: шаблон промпта с описанием переменных
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseConfig {
    pub template: String,

    #[serde(default)]
    pub variables: Vec<VariableSpec>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub usage_count: u64,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl UseCaseConfig {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: Vec::new(),
            tags: BTreeSet::new(),
            usage_count: 0,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn with_variables(mut self, variables: Vec<VariableSpec>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Значения по умолчанию для всех переменных
    pub fn default_values(&self) -> BTreeMap<String, VariableValue> {
        self.variables
            .iter()
            .map(|v| (v.name.clone(), v.default.clone()))
            .collect()
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for variable in &self.variables {
            variable.validate()?;
            if !seen.insert(variable.name.as_str()) {
                return Err(format!("Duplicate variable name '{}'", variable.name));
            }
        }
        Ok(())
    }

    pub fn placeholder_report(&self) -> PlaceholderReport {
        let placeholders = extract_placeholders(&self.template);
        let unused_variables = self
            .variables
            .iter()
            .filter(|v| !placeholders.iter().any(|p| p == &v.name))
            .map(|v| v.name.clone())
            .collect();
        let undeclared_placeholders = placeholders
            .into_iter()
            .filter(|p| self.variable(p).is_none())
            .collect();
        PlaceholderReport {
            unused_variables,
            undeclared_placeholders,
        }
    }
}

/// Семейство: use case по имени
pub type Family = BTreeMap<String, UseCaseConfig>;

/// Ошибки операций над библиотекой шаблонов
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("Family '{0}' not found")]
    FamilyNotFound(String),

    #[error("Use case '{1}' not found in family '{0}'")]
    UseCaseNotFound(String, String),

    #[error("Family '{0}' already exists")]
    DuplicateFamily(String),

    #[error("Use case '{1}' already exists in family '{0}'")]
    DuplicateUseCase(String, String),

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid use case: {0}")]
    Invalid(String),
}

/// Статистика библиотеки для главной страницы
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub families: usize,
    pub use_cases: usize,
    pub total_usage: u64,
}

/// Библиотека шаблонов: семейство -> use case -> конфигурация.
///
/// Весь документ хранится и сохраняется целиком.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptLibrary {
    pub families: BTreeMap<String, Family>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family_names(&self) -> Vec<String> {
        self.families.keys().cloned().collect()
    }

    pub fn family(&self, name: &str) -> Option<&Family> {
        self.families.get(name)
    }

    pub fn use_case(&self, family: &str, name: &str) -> Option<&UseCaseConfig> {
        self.families.get(family).and_then(|f| f.get(name))
    }

    pub fn add_family(&mut self, name: &str) -> Result<(), LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        if self.families.contains_key(name) {
            return Err(LibraryError::DuplicateFamily(name.to_string()));
        }
        self.families.insert(name.to_string(), Family::new());
        Ok(())
    }

    /// Удаляет семейство вместе со всеми use case
    pub fn delete_family(&mut self, name: &str) -> Result<Family, LibraryError> {
        self.families
            .remove(name)
            .ok_or_else(|| LibraryError::FamilyNotFound(name.to_string()))
    }

    /// Создание, замена или переименование use case.
    ///
    /// При замене сохраняются `created_at` и `usage_count` прежней записи.
    pub fn upsert_use_case(
        &mut self,
        family: &str,
        original_name: Option<&str>,
        name: &str,
        mut config: UseCaseConfig,
    ) -> Result<(), LibraryError> {
        let family = family.trim();
        let name = name.trim();
        if family.is_empty() || name.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        config.validate().map_err(LibraryError::Invalid)?;

        let original = original_name.map(str::trim).filter(|o| !o.is_empty());
        let rename_from = original.filter(|old| *old != name);

        // Проверки до любых изменений: при ошибке библиотека не меняется
        if let Some(old) = rename_from {
            let existing = self.families.get(family);
            if existing.map_or(false, |e| e.contains_key(name)) {
                return Err(LibraryError::DuplicateUseCase(
                    family.to_string(),
                    name.to_string(),
                ));
            }
            if !existing.map_or(false, |e| e.contains_key(old)) {
                return Err(LibraryError::UseCaseNotFound(
                    family.to_string(),
                    old.to_string(),
                ));
            }
        }

        let entries = self.families.entry(family.to_string()).or_default();
        let previous = entries.remove(rename_from.unwrap_or(name));

        if let Some(previous) = previous {
            config.metadata.created_at = previous.metadata.created_at;
            config.usage_count = previous.usage_count;
        }
        config.touch();
        entries.insert(name.to_string(), config);
        Ok(())
    }

    /// Копия use case под новым именем (или "<name> (copy)", "<name> (copy 2)"...)
    pub fn duplicate_use_case(
        &mut self,
        family: &str,
        name: &str,
        new_name: Option<&str>,
    ) -> Result<String, LibraryError> {
        let entries = self
            .families
            .get_mut(family)
            .ok_or_else(|| LibraryError::FamilyNotFound(family.to_string()))?;
        let source = entries
            .get(name)
            .cloned()
            .ok_or_else(|| LibraryError::UseCaseNotFound(family.to_string(), name.to_string()))?;

        let target = match new_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(requested) => {
                if entries.contains_key(requested) {
                    return Err(LibraryError::DuplicateUseCase(
                        family.to_string(),
                        requested.to_string(),
                    ));
                }
                requested.to_string()
            }
            None => {
                let mut candidate = format!("{} (copy)", name);
                let mut n = 2;
                while entries.contains_key(&candidate) {
                    candidate = format!("{} (copy {})", name, n);
                    n += 1;
                }
                candidate
            }
        };

        let mut copy = source;
        copy.usage_count = 0;
        copy.metadata = EntityMetadata::new();
        entries.insert(target.clone(), copy);
        Ok(target)
    }

    pub fn delete_use_case(&mut self, family: &str, name: &str) -> Result<UseCaseConfig, LibraryError> {
        let entries = self
            .families
            .get_mut(family)
            .ok_or_else(|| LibraryError::FamilyNotFound(family.to_string()))?;
        entries
            .remove(name)
            .ok_or_else(|| LibraryError::UseCaseNotFound(family.to_string(), name.to_string()))
    }

    /// Увеличивает счётчик использований, возвращает новое значение
    pub fn record_usage(&mut self, family: &str, name: &str) -> Result<u64, LibraryError> {
        let config = self
            .families
            .get_mut(family)
            .and_then(|f| f.get_mut(name))
            .ok_or_else(|| LibraryError::UseCaseNotFound(family.to_string(), name.to_string()))?;
        config.usage_count += 1;
        config.touch();
        Ok(config.usage_count)
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.families
            .values()
            .flat_map(|f| f.values())
            .flat_map(|c| c.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn stats(&self) -> LibraryStats {
        let use_cases = self.families.values().map(|f| f.len()).sum();
        let total_usage = self
            .families
            .values()
            .flat_map(|f| f.values())
            .map(|c| c.usage_count)
            .sum();
        LibraryStats {
            families: self.families.len(),
            use_cases,
            total_usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PromptLibrary {
        let mut library = PromptLibrary::new();
        library
            .upsert_use_case(
                "Marketing",
                None,
                "Tagline",
                UseCaseConfig::new("Tagline for {product}")
                    .with_variables(vec![VariableSpec::text("product", "Product")])
                    .with_tags(&["copy"]),
            )
            .unwrap();
        library
    }

    #[test]
    fn test_upsert_creates_family() {
        let library = sample();
        assert_eq!(library.family_names(), vec!["Marketing".to_string()]);
        assert!(library.use_case("Marketing", "Tagline").is_some());
    }

    #[test]
    fn test_upsert_preserves_usage_and_created_at() {
        let mut library = sample();
        library.record_usage("Marketing", "Tagline").unwrap();
        let created = library.use_case("Marketing", "Tagline").unwrap().metadata.created_at;

        library
            .upsert_use_case("Marketing", Some("Tagline"), "Tagline", UseCaseConfig::new("New {product}"))
            .unwrap();
        let updated = library.use_case("Marketing", "Tagline").unwrap();
        assert_eq!(updated.template, "New {product}");
        assert_eq!(updated.usage_count, 1);
        assert_eq!(updated.metadata.created_at, created);
    }

    #[test]
    fn test_rename_rejects_existing_target() {
        let mut library = sample();
        library
            .upsert_use_case("Marketing", None, "Slogan", UseCaseConfig::new("x"))
            .unwrap();
        let err = library
            .upsert_use_case("Marketing", Some("Tagline"), "Slogan", UseCaseConfig::new("y"))
            .unwrap_err();
        assert_eq!(
            err,
            LibraryError::DuplicateUseCase("Marketing".into(), "Slogan".into())
        );
        // ничего не потеряно
        assert!(library.use_case("Marketing", "Tagline").is_some());
    }

    #[test]
    fn test_rename_moves_entry() {
        let mut library = sample();
        library
            .upsert_use_case("Marketing", Some("Tagline"), "Slogan", UseCaseConfig::new("y"))
            .unwrap();
        assert!(library.use_case("Marketing", "Tagline").is_none());
        assert!(library.use_case("Marketing", "Slogan").is_some());
    }

    #[test]
    fn test_failed_rename_does_not_create_family() {
        let mut library = sample();
        let err = library
            .upsert_use_case("Ghosts", Some("Missing"), "New", UseCaseConfig::new("x"))
            .unwrap_err();
        assert_eq!(
            err,
            LibraryError::UseCaseNotFound("Ghosts".into(), "Missing".into())
        );
        assert_eq!(library.family_names(), vec!["Marketing".to_string()]);

        let err = library
            .upsert_use_case("Marketing", Some("Missing"), "New", UseCaseConfig::new("x"))
            .unwrap_err();
        assert_eq!(
            err,
            LibraryError::UseCaseNotFound("Marketing".into(), "Missing".into())
        );
        assert!(library.use_case("Marketing", "New").is_none());
    }

    #[test]
    fn test_upsert_rejects_select_without_options() {
        let mut library = PromptLibrary::new();
        let config = UseCaseConfig::new("{tone}")
            .with_variables(vec![VariableSpec::new("tone", "Tone", VariableType::Select)]);
        assert!(matches!(
            library.upsert_use_case("F", None, "U", config),
            Err(LibraryError::Invalid(_))
        ));
    }

    #[test]
    fn test_duplicate_picks_free_name_and_resets_usage() {
        let mut library = sample();
        library.record_usage("Marketing", "Tagline").unwrap();
        let first = library.duplicate_use_case("Marketing", "Tagline", None).unwrap();
        let second = library.duplicate_use_case("Marketing", "Tagline", None).unwrap();
        assert_eq!(first, "Tagline (copy)");
        assert_eq!(second, "Tagline (copy 2)");
        assert_eq!(library.use_case("Marketing", &first).unwrap().usage_count, 0);
    }

    #[test]
    fn test_delete_and_missing() {
        let mut library = sample();
        assert!(library.delete_use_case("Marketing", "Tagline").is_ok());
        assert_eq!(
            library.delete_use_case("Marketing", "Tagline").unwrap_err(),
            LibraryError::UseCaseNotFound("Marketing".into(), "Tagline".into())
        );
        assert_eq!(
            library.delete_family("Nope").unwrap_err(),
            LibraryError::FamilyNotFound("Nope".into())
        );
    }

    #[test]
    fn test_add_family_validation() {
        let mut library = sample();
        assert_eq!(library.add_family("  ").unwrap_err(), LibraryError::EmptyName);
        assert_eq!(
            library.add_family("Marketing").unwrap_err(),
            LibraryError::DuplicateFamily("Marketing".into())
        );
        assert!(library.add_family("Sales").is_ok());
    }

    #[test]
    fn test_stats_and_tags() {
        let mut library = sample();
        library.record_usage("Marketing", "Tagline").unwrap();
        library.record_usage("Marketing", "Tagline").unwrap();
        let stats = library.stats();
        assert_eq!(stats.families, 1);
        assert_eq!(stats.use_cases, 1);
        assert_eq!(stats.total_usage, 2);
        assert_eq!(library.all_tags(), vec!["copy".to_string()]);
    }

    #[test]
    fn test_placeholder_report() {
        let config = UseCaseConfig::new("Write about {topic} for {audience}").with_variables(vec![
            VariableSpec::text("topic", "Topic"),
            VariableSpec::text("tone", "Tone"),
        ]);
        let report = config.placeholder_report();
        assert_eq!(report.unused_variables, vec!["tone".to_string()]);
        assert_eq!(report.undeclared_placeholders, vec!["audience".to_string()]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(VariableValue::Number(3.0).to_string(), "3");
        assert_eq!(VariableValue::Number(-2.25).to_string(), "-2.25");
    }
}
