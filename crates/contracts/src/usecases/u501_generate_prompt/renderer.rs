use crate::domain::a001_prompt_library::aggregate::{UseCaseConfig, VariableValue};
use crate::shared::placeholder::{format_strict, render_with_values};
use std::collections::BTreeMap;

/// Результат подстановки значений в шаблон use case
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub text: String,
    /// Текст ошибки строгого режима; `text` тогда содержит исходный шаблон
    pub error: Option<String>,
}

/// Подставляет значения формы в шаблон.
///
/// Значения по умолчанию переменных дополняют `values`. В строгом режиме
/// ошибка форматирования не прерывает генерацию: возвращается исходный
/// шаблон и сообщение для пользователя.
pub fn render_use_case(
    config: &UseCaseConfig,
    values: &BTreeMap<String, VariableValue>,
    strict: bool,
) -> Rendering {
    let mut merged = config.default_values();
    merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

    if !strict {
        return Rendering {
            text: render_with_values(&config.template, &merged),
            error: None,
        };
    }

    let stringified: BTreeMap<String, String> = merged
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect();
    match format_strict(&config.template, &stringified) {
        Ok(text) => Rendering { text, error: None },
        Err(e) => Rendering {
            text: config.template.clone(),
            error: Some(format!("Template formatting failed: {}. Showing the raw template.", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_prompt_library::aggregate::{VariableSpec, VariableType};

    fn config() -> UseCaseConfig {
        UseCaseConfig::new("Hello {name}, order {name_full}. Qty {qty}").with_variables(vec![
            VariableSpec::text("name", "Name"),
            VariableSpec::text("name_full", "Order"),
            VariableSpec::new("qty", "Quantity", VariableType::Number)
                .with_default(VariableValue::Number(2.0)),
        ])
    }

    #[test]
    fn test_longer_key_and_defaults() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), VariableValue::Text("Al".into()));
        values.insert("name_full".to_string(), VariableValue::Text("ALF-1".into()));

        let rendering = render_use_case(&config(), &values, false);
        assert_eq!(rendering.text, "Hello Al, order ALF-1. Qty 2");
        assert_eq!(rendering.error, None);
    }

    #[test]
    fn test_strict_mode_ok() {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), VariableValue::Text("Al".into()));
        let rendering = render_use_case(&config(), &values, true);
        // name_full берётся из пустого default
        assert_eq!(rendering.text, "Hello Al, order . Qty 2");
        assert!(rendering.error.is_none());
    }

    #[test]
    fn test_strict_mode_falls_back_to_raw_template() {
        let config = UseCaseConfig::new("Summary for {team}");
        let rendering = render_use_case(&config, &BTreeMap::new(), true);
        assert_eq!(rendering.text, "Summary for {team}");
        assert!(rendering.error.unwrap().contains("{team}"));
    }

    #[test]
    fn test_lenient_mode_keeps_unknown_placeholder() {
        let config = UseCaseConfig::new("Summary for {team}, {{owner}}");
        let rendering = render_use_case(&config, &BTreeMap::new(), false);
        assert_eq!(rendering.text, "Summary for {team}, {owner}");
    }
}
