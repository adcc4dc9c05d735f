//! Use case editor - ViewModel
//!
//! Reactive state of the editor form

use super::model::{build_config, preview, validate_form, FormPreview, VariableForm};
use contracts::domain::a001_prompt_library::aggregate::{UseCaseConfig, VariableSpec};
use contracts::domain::a001_prompt_library::dto::UseCaseUpsertDto;
use contracts::shared::placeholder::extract_placeholders;
use leptos::prelude::*;

/// Строка переменной: каждое поле отдельным сигналом
#[derive(Clone, Copy)]
pub struct VariableRowVm {
    pub id: usize,
    pub name: RwSignal<String>,
    pub label: RwSignal<String>,
    pub var_type: RwSignal<String>,
    pub default_value: RwSignal<String>,
    pub options: RwSignal<String>,
    pub min: RwSignal<String>,
    pub max: RwSignal<String>,
    pub step: RwSignal<String>,
    pub height: RwSignal<String>,
    pub help: RwSignal<String>,
}

impl VariableRowVm {
    fn from_form(id: usize, form: VariableForm) -> Self {
        Self {
            id,
            name: RwSignal::new(form.name),
            label: RwSignal::new(form.label),
            var_type: RwSignal::new(form.var_type),
            default_value: RwSignal::new(form.default_value),
            options: RwSignal::new(form.options),
            min: RwSignal::new(form.min),
            max: RwSignal::new(form.max),
            step: RwSignal::new(form.step),
            height: RwSignal::new(form.height),
            help: RwSignal::new(form.help),
        }
    }

    pub fn to_form(&self) -> VariableForm {
        VariableForm {
            name: self.name.get(),
            label: self.label.get(),
            var_type: self.var_type.get(),
            default_value: self.default_value.get(),
            options: self.options.get(),
            min: self.min.get(),
            max: self.max.get(),
            step: self.step.get(),
            height: self.height.get(),
            help: self.help.get(),
        }
    }
}

/// ViewModel for the use case editor
#[derive(Clone, Copy)]
pub struct UseCaseEditorVm {
    pub family: RwSignal<String>,
    pub name: RwSignal<String>,
    /// Имя, под которым запись загружена; `None` для новой
    pub original_name: RwSignal<Option<String>>,
    pub template: RwSignal<String>,
    /// Теги через запятую
    pub tags: RwSignal<String>,
    pub variables: RwSignal<Vec<VariableRowVm>>,
    pub usage_count: RwSignal<u64>,
    pub is_loading: RwSignal<bool>,
    pub is_saving: RwSignal<bool>,
    next_id: StoredValue<usize>,
}

impl UseCaseEditorVm {
    pub fn new(family: String) -> Self {
        Self {
            family: RwSignal::new(family),
            name: RwSignal::new(String::new()),
            original_name: RwSignal::new(None),
            template: RwSignal::new(String::new()),
            tags: RwSignal::new(String::new()),
            variables: RwSignal::new(Vec::new()),
            usage_count: RwSignal::new(0),
            is_loading: RwSignal::new(false),
            is_saving: RwSignal::new(false),
            next_id: StoredValue::new(0),
        }
    }

    fn next_row_id(&self) -> usize {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        id
    }

    pub fn is_edit_mode(&self) -> bool {
        self.original_name.get().is_some()
    }

    /// Заполнить форму загруженным use case
    pub fn load(&self, name: &str, config: &UseCaseConfig) {
        self.name.set(name.to_string());
        self.original_name.set(Some(name.to_string()));
        self.template.set(config.template.clone());
        self.tags
            .set(config.tags.iter().cloned().collect::<Vec<_>>().join(", "));
        self.usage_count.set(config.usage_count);
        let rows = config
            .variables
            .iter()
            .map(|spec| VariableRowVm::from_form(self.next_row_id(), VariableForm::from_spec(spec)))
            .collect();
        self.variables.set(rows);
    }

    pub fn add_variable(&self, name: &str) {
        let spec = VariableSpec::text(name, "");
        let row = VariableRowVm::from_form(self.next_row_id(), VariableForm::from_spec(&spec));
        self.variables.update(|rows| rows.push(row));
    }

    pub fn remove_variable(&self, id: usize) {
        self.variables.update(|rows| rows.retain(|r| r.id != id));
    }

    /// Сдвиг строки вверх (`-1`) или вниз (`1`)
    pub fn move_variable(&self, id: usize, delta: isize) {
        self.variables.update(|rows| {
            let Some(index) = rows.iter().position(|r| r.id == id) else {
                return;
            };
            let target = index as isize + delta;
            if target >= 0 && (target as usize) < rows.len() {
                rows.swap(index, target as usize);
            }
        });
    }

    /// Добавить строки для плейсхолдеров шаблона, у которых нет переменной
    pub fn add_missing_variables(&self) -> usize {
        let existing: Vec<String> = self
            .variables
            .get_untracked()
            .iter()
            .map(|r| r.name.get_untracked())
            .collect();
        let missing: Vec<String> = extract_placeholders(&self.template.get_untracked())
            .into_iter()
            .filter(|p| !existing.contains(p))
            .collect();
        for name in &missing {
            self.add_variable(name);
        }
        missing.len()
    }

    pub fn forms(&self) -> Vec<VariableForm> {
        self.variables.get().iter().map(VariableRowVm::to_form).collect()
    }

    pub fn config_json(&self) -> serde_json::Value {
        build_config(&self.template.get(), &self.forms(), &self.tags.get())
    }

    /// Нормализованная форма для предупреждений под редактором
    pub fn preview(&self) -> FormPreview {
        preview(&self.config_json())
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_form(&self.name.get(), &self.template.get(), &self.forms())
    }

    pub fn build_dto(&self) -> UseCaseUpsertDto {
        UseCaseUpsertDto {
            original_name: self.original_name.get(),
            config: self.config_json(),
        }
    }
}
