//! Встроенная библиотека по умолчанию.
//!
//! Используется, когда удалённый документ недоступен, и как стартовое
//! содержимое нового gist.

use super::aggregate::{PromptLibrary, UseCaseConfig, VariableSpec, VariableType, VariableValue};
use chrono::NaiveDate;

pub fn default_library() -> PromptLibrary {
    let mut library = PromptLibrary::new();

    let marketing = library.families.entry("Marketing".to_string()).or_default();
    marketing.insert(
        "Product description".to_string(),
        UseCaseConfig::new(
            "Write a {tone} product description for {product_name}.\n\
             Target audience: {audience}.\n\
             Length: about {word_count} words.\n\
             Key features:\n{features}\n\
             Launch date: {launch_date}.",
        )
        .with_variables(vec![
            VariableSpec::text("product_name", "Product name"),
            VariableSpec::text("audience", "Target audience")
                .with_default(VariableValue::Text("small business owners".into())),
            VariableSpec::new("tone", "Tone", VariableType::Select)
                .with_options(&["professional", "friendly", "playful"])
                .with_default(VariableValue::Text("professional".into())),
            VariableSpec::new("word_count", "Word count", VariableType::Number)
                .with_default(VariableValue::Number(150.0))
                .with_bounds(Some(50.0), Some(1000.0), Some(10.0)),
            VariableSpec::new("features", "Key features", VariableType::Textarea)
                .with_height(120)
                .with_help("One feature per line"),
            VariableSpec::new("launch_date", "Launch date", VariableType::Date).with_default(
                VariableValue::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default()),
            ),
        ])
        .with_tags(&["copywriting", "product"]),
    );
    marketing.insert(
        "Social post".to_string(),
        UseCaseConfig::new(
            "Draft a {platform} post announcing {topic}. Keep it under {max_chars} characters \
             and end with the hashtag {{hashtag}} left for the scheduler.",
        )
        .with_variables(vec![
            VariableSpec::new("platform", "Platform", VariableType::Select)
                .with_options(&["LinkedIn", "X", "Instagram"])
                .with_default(VariableValue::Text("LinkedIn".into())),
            VariableSpec::text("topic", "Topic"),
            VariableSpec::new("max_chars", "Max characters", VariableType::Number)
                .with_default(VariableValue::Number(280.0))
                .with_bounds(Some(50.0), Some(3000.0), Some(10.0)),
        ])
        .with_tags(&["social"]),
    );

    let engineering = library.families.entry("Engineering".to_string()).or_default();
    engineering.insert(
        "Code review".to_string(),
        UseCaseConfig::new(
            "Review the following {language} code. Focus on {focus}.\n\n```\n{code}\n```",
        )
        .with_variables(vec![
            VariableSpec::text("language", "Language")
                .with_default(VariableValue::Text("Rust".into())),
            VariableSpec::new("focus", "Focus", VariableType::Select)
                .with_options(&["correctness", "performance", "readability"])
                .with_default(VariableValue::Text("correctness".into())),
            VariableSpec::new("code", "Code", VariableType::Textarea).with_height(240),
        ])
        .with_tags(&["review", "code"]),
    );
    engineering.insert(
        "Incident summary".to_string(),
        UseCaseConfig::new(
            "Summarize the incident of {incident_date} for {audience}.\n\
             Timeline and notes:\n{notes}",
        )
        .with_variables(vec![
            VariableSpec::new("incident_date", "Incident date", VariableType::Date).with_default(
                VariableValue::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()),
            ),
            VariableSpec::text("audience", "Audience")
                .with_default(VariableValue::Text("leadership".into())),
            VariableSpec::new("notes", "Notes", VariableType::Textarea),
        ])
        .with_tags(&["ops"]),
    );

    library
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let library = default_library();
        assert_eq!(library.family_names(), vec!["Engineering", "Marketing"]);
        for family in library.families.values() {
            for config in family.values() {
                assert!(config.validate().is_ok());
                assert!(config.placeholder_report().unused_variables.is_empty());
            }
        }
    }

    #[test]
    fn test_defaults_cover_every_variable_type() {
        let library = default_library();
        for var_type in VariableType::ALL {
            assert!(
                library
                    .families
                    .values()
                    .flat_map(|f| f.values())
                    .flat_map(|c| c.variables.iter())
                    .any(|v| v.var_type == var_type),
                "no {} variable",
                var_type.as_str()
            );
        }
    }
}
