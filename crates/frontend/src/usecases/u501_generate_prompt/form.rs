//! Значения формы генератора: строки из полей ввода в типизированные значения

use chrono::NaiveDate;
use contracts::domain::a001_prompt_library::aggregate::{VariableSpec, VariableType, VariableValue};
use std::collections::BTreeMap;

/// Начальное значение поля: default переменной в текстовом виде
pub fn initial_value(spec: &VariableSpec) -> String {
    spec.default.to_string()
}

/// Значение одного поля.
///
/// Пустое число или дата означает "не задано": на сервере подставится default.
/// Нераспознанный ввод уходит текстом и выводится как есть.
pub fn field_value(spec: &VariableSpec, raw: &str) -> Option<VariableValue> {
    match spec.var_type {
        VariableType::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(
                trimmed
                    .parse::<f64>()
                    .map(VariableValue::Number)
                    .unwrap_or_else(|_| VariableValue::Text(trimmed.to_string())),
            )
        }
        VariableType::Date => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(VariableValue::Date)
                    .unwrap_or_else(|_| VariableValue::Text(trimmed.to_string())),
            )
        }
        VariableType::Text | VariableType::Textarea | VariableType::Select => {
            Some(VariableValue::Text(raw.to_string()))
        }
    }
}

pub fn collect_values<'a>(
    fields: impl IntoIterator<Item = (&'a VariableSpec, String)>,
) -> BTreeMap<String, VariableValue> {
    fields
        .into_iter()
        .filter_map(|(spec, raw)| field_value(spec, &raw).map(|v| (spec.name.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_field() {
        let spec = VariableSpec::new("words", "Words", VariableType::Number);
        assert_eq!(field_value(&spec, " 150 "), Some(VariableValue::Number(150.0)));
        assert_eq!(field_value(&spec, ""), None);
        assert_eq!(
            field_value(&spec, "many"),
            Some(VariableValue::Text("many".into()))
        );
    }

    #[test]
    fn test_date_field() {
        let spec = VariableSpec::new("due", "Due", VariableType::Date);
        assert_eq!(
            field_value(&spec, "2024-03-01"),
            Some(VariableValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
        assert_eq!(field_value(&spec, "  "), None);
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let spec = VariableSpec::new("notes", "Notes", VariableType::Textarea);
        assert_eq!(
            field_value(&spec, "  line\n"),
            Some(VariableValue::Text("  line\n".into()))
        );
    }

    #[test]
    fn test_collect_skips_empty_numbers() {
        let number = VariableSpec::new("n", "N", VariableType::Number);
        let text = VariableSpec::text("t", "T");
        let values = collect_values(vec![(&number, String::new()), (&text, "x".to_string())]);
        assert_eq!(values.len(), 1);
        assert_eq!(values["t"], VariableValue::Text("x".into()));
    }

    #[test]
    fn test_initial_value_formats_integers() {
        let spec = VariableSpec::new("n", "N", VariableType::Number)
            .with_default(VariableValue::Number(3.0));
        assert_eq!(initial_value(&spec), "3");
    }
}
