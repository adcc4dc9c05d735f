//! Поиск и фильтрация use case для страницы библиотеки

use super::aggregate::{PromptLibrary, UseCaseConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    /// Семейство, затем имя
    #[default]
    Name,
    MostUsed,
    RecentlyUpdated,
}

impl SearchSort {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s {
            "most_used" => SearchSort::MostUsed,
            "recently_updated" => SearchSort::RecentlyUpdated,
            _ => SearchSort::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Name => "name",
            SearchSort::MostUsed => "most_used",
            SearchSort::RecentlyUpdated => "recently_updated",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Ограничить одним семейством
    pub family: Option<String>,
    /// Подстрока (без учёта регистра)
    pub text: String,
    /// Use case подходит, если у него есть хотя бы один из тегов
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub sort: SearchSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseHit {
    pub family: String,
    pub name: String,
    pub config: UseCaseConfig,
}

pub fn search_use_cases(library: &PromptLibrary, query: &SearchQuery) -> Vec<UseCaseHit> {
    let needle = query.text.trim().to_lowercase();

    let mut hits: Vec<UseCaseHit> = library
        .families
        .iter()
        .filter(|(family, _)| query.family.as_deref().map_or(true, |f| f == family.as_str()))
        .flat_map(|(family, entries)| {
            entries.iter().map(move |(name, config)| (family, name, config))
        })
        .filter(|(_, name, config)| matches_text(name, config, &needle))
        .filter(|(_, _, config)| matches_tags(config, &query.tags))
        .map(|(family, name, config)| UseCaseHit {
            family: family.clone(),
            name: name.clone(),
            config: config.clone(),
        })
        .collect();

    match query.sort {
        SearchSort::Name => {}
        SearchSort::MostUsed => hits.sort_by(|a, b| {
            b.config
                .usage_count
                .cmp(&a.config.usage_count)
                .then_with(|| a.name.cmp(&b.name))
        }),
        SearchSort::RecentlyUpdated => hits.sort_by(|a, b| {
            b.config
                .metadata
                .updated_at
                .cmp(&a.config.metadata.updated_at)
        }),
    }

    hits
}

fn matches_text(name: &str, config: &UseCaseConfig, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |s: &str| s.to_lowercase().contains(needle);

    contains(name)
        || contains(config.template.as_str())
        || config.variables.iter().any(|v| {
            contains(v.name.as_str())
                || contains(v.label.as_str())
                || v.help.as_deref().map_or(false, contains)
                || v.options.iter().any(|o| contains(o.as_str()))
        })
}

fn matches_tags(config: &UseCaseConfig, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || config.tags.intersection(selected).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_prompt_library::defaults::default_library;

    fn names(hits: &[UseCaseHit]) -> Vec<&str> {
        hits.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_sorted() {
        let hits = search_use_cases(&default_library(), &SearchQuery::default());
        assert_eq!(
            names(&hits),
            vec!["Code review", "Incident summary", "Product description", "Social post"]
        );
    }

    #[test]
    fn test_text_matches_template_and_variable_metadata() {
        let library = default_library();
        let by_template = SearchQuery {
            text: "HASHTAG".into(),
            ..Default::default()
        };
        assert_eq!(names(&search_use_cases(&library, &by_template)), vec!["Social post"]);

        // вариант из options переменной
        let by_option = SearchQuery {
            text: "readability".into(),
            ..Default::default()
        };
        assert_eq!(names(&search_use_cases(&library, &by_option)), vec!["Code review"]);
    }

    #[test]
    fn test_tag_intersection_and_family_filter() {
        let library = default_library();
        let query = SearchQuery {
            tags: ["social", "ops"].iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        assert_eq!(
            names(&search_use_cases(&library, &query)),
            vec!["Incident summary", "Social post"]
        );

        let scoped = SearchQuery {
            family: Some("Marketing".into()),
            tags: query.tags.clone(),
            ..Default::default()
        };
        assert_eq!(names(&search_use_cases(&library, &scoped)), vec!["Social post"]);
    }

    #[test]
    fn test_tags_are_exact_match() {
        let query = SearchQuery {
            tags: ["soc".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(search_use_cases(&default_library(), &query).is_empty());
    }

    #[test]
    fn test_most_used_sort() {
        let mut library = default_library();
        library.record_usage("Engineering", "Incident summary").unwrap();
        library.record_usage("Engineering", "Incident summary").unwrap();
        library.record_usage("Marketing", "Social post").unwrap();
        let query = SearchQuery {
            sort: SearchSort::MostUsed,
            ..Default::default()
        };
        let hits = search_use_cases(&library, &query);
        assert_eq!(&names(&hits)[..2], &["Incident summary", "Social post"]);
    }
}
