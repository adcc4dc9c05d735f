//! Use case editor - View Component
//!
//! Form for creating and editing a use case: name, template, tags and
//! the ordered list of variables with type specific fields.

use super::view_model::{UseCaseEditorVm, VariableRowVm};
use crate::app::use_app;
use crate::domain::a001_prompt_library::api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use contracts::domain::a001_prompt_library::aggregate::VariableType;
use contracts::shared::navigation::NavAction;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
fn VariableRow(row: VariableRowVm, vm: UseCaseEditorVm) -> impl IntoView {
    let var_type = Memo::new(move |_| VariableType::from_str(&row.var_type.get()).unwrap_or_default());

    view! {
        <div class="variable-row">
            <div class="variable-row__main">
                <div class="form__group">
                    <label class="form__label">"Name"</label>
                    <Input value=row.name placeholder="customer_name" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Label"</label>
                    <Input value=row.label placeholder="Customer name" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Type"</label>
                    <Select value=row.var_type>
                        {VariableType::ALL
                            .iter()
                            .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                            .collect_view()}
                    </Select>
                </div>
                <div class="form__group">
                    <label class="form__label">"Default (dates as YYYY-MM-DD)"</label>
                    <Input value=row.default_value placeholder="Default value" />
                </div>
                <Space>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        size=ButtonSize::Small
                        attr:title="Move up"
                        on_click=move |_| vm.move_variable(row.id, -1)
                    >
                        "▲"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        size=ButtonSize::Small
                        attr:title="Move down"
                        on_click=move |_| vm.move_variable(row.id, 1)
                    >
                        "▼"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        size=ButtonSize::Small
                        attr:title="Remove"
                        on_click=move |_| vm.remove_variable(row.id)
                    >
                        {icon("delete")}
                    </Button>
                </Space>
            </div>

            <div class="variable-row__extra">
                {move || match var_type.get() {
                    VariableType::Select => view! {
                        <div class="form__group">
                            <label class="form__label">"Options (one per line)"</label>
                            <Textarea value=row.options />
                        </div>
                    }
                        .into_any(),
                    VariableType::Number => view! {
                        <div class="variable-row__bounds">
                            <div class="form__group">
                                <label class="form__label">"Min"</label>
                                <Input value=row.min />
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Max"</label>
                                <Input value=row.max />
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Step"</label>
                                <Input value=row.step />
                            </div>
                        </div>
                    }
                        .into_any(),
                    VariableType::Textarea => view! {
                        <div class="form__group">
                            <label class="form__label">"Height, px (min 68)"</label>
                            <Input value=row.height placeholder="100" />
                        </div>
                    }
                        .into_any(),
                    VariableType::Text | VariableType::Date => view! { <></> }.into_any(),
                }}
                <div class="form__group">
                    <label class="form__label">"Help"</label>
                    <Input value=row.help placeholder="Shown under the field" />
                </div>
            </div>
        </div>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn UseCaseEditor(family: Option<String>, use_case: Option<String>) -> impl IntoView {
    let ctx = use_app();

    let Some(family) = family else {
        return view! {
            <PageFrame page_id="a001_prompt_library--detail" category=PAGE_CAT_DETAIL>
                <div class="empty-state">
                    "Choose a family before creating a use case. "
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| ctx.dispatch(NavAction::PickFamily)>
                        {icon("folder-open")}
                        " Choose family"
                    </Button>
                </div>
            </PageFrame>
        }
            .into_any();
    };

    let vm = UseCaseEditorVm::new(family.clone());

    if let Some(name) = use_case {
        vm.is_loading.set(true);
        let family = family.clone();
        spawn_local(async move {
            match api::fetch_use_case(&family, &name).await {
                Ok(config) => vm.load(&name, &config),
                Err(e) => ctx.error(format!("Cannot load '{}': {}", name, e)),
            }
            vm.is_loading.set(false);
        });
    }

    let handle_save = move |_| {
        if let Err(e) = vm.validate() {
            ctx.error(e);
            return;
        }
        let family = vm.family.get();
        let name = vm.name.get().trim().to_string();
        let dto = vm.build_dto();
        vm.is_saving.set(true);

        spawn_local(async move {
            match api::save_use_case(&family, &name, &dto).await {
                Ok(resp) => {
                    vm.original_name.set(Some(name.clone()));
                    vm.is_saving.set(false);
                    ctx.dispatch(NavAction::EditUseCase {
                        family,
                        use_case: name,
                    });
                    ctx.report(resp.message, resp.persist_warning);
                }
                Err(e) => {
                    vm.is_saving.set(false);
                    ctx.error(e);
                }
            }
        });
    };

    let handle_add_missing = move |_| {
        let added = vm.add_missing_variables();
        if added == 0 {
            ctx.success("Every placeholder already has a variable");
        }
    };

    let handle_generate = move |_| {
        if let Some(name) = vm.original_name.get() {
            ctx.dispatch(NavAction::OpenGenerator {
                family: vm.family.get(),
                use_case: name,
            });
        }
    };

    let preview = Signal::derive(move || vm.preview());
    let title = Signal::derive(move || {
        if vm.is_edit_mode() {
            format!("Edit use case: {}", vm.original_name.get().unwrap_or_default())
        } else {
            "New use case".to_string()
        }
    });
    let subtitle = Signal::derive(move || {
        format!("Family: {} · used {} time(s)", vm.family.get(), vm.usage_count.get())
    });

    view! {
        <PageFrame page_id="a001_prompt_library--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title=title subtitle=subtitle>
                <Space>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=handle_save
                        disabled=Signal::derive(move || vm.is_saving.get() || vm.is_loading.get())
                    >
                        {icon("save")}
                        {move || if vm.is_saving.get() { " Saving..." } else { " Save" }}
                    </Button>
                    <Show when=move || vm.is_edit_mode()>
                        <Button appearance=ButtonAppearance::Secondary on_click=handle_generate>
                            {icon("play")}
                            " Generate"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenLibrary)>
                        {icon("close")}
                        " Close"
                    </Button>
                </Space>
            </PageHeader>

            <div class="page__content editor-layout">
                <Card>
                    <div class="form__group">
                        <label class="form__label">
                            "Name"
                            <span style="color: red;">"*"</span>
                        </label>
                        <Input value=vm.name placeholder="follow_up_email" />
                    </div>

                    <div class="form__group">
                        <label class="form__label">
                            "Template"
                            <span style="color: red;">"*"</span>
                        </label>
                        <Textarea
                            attr:style="min-height: 220px; font-family: monospace;"
                            value=vm.template
                            placeholder="Write a {tone} email to {customer_name}... Use {{name}} for text that must keep its braces."
                        />
                    </div>

                    <div class="form__group">
                        <label class="form__label">"Tags (comma separated)"</label>
                        <Input value=vm.tags placeholder="sales, email" />
                    </div>

                    {move || {
                        let p = preview.get();
                        let report = p.report;
                        let mut lines = p.warnings;
                        if !report.undeclared_placeholders.is_empty() {
                            lines.push(format!(
                                "Placeholders without a variable stay as-is: {}",
                                report.undeclared_placeholders.join(", ")
                            ));
                        }
                        if !report.unused_variables.is_empty() {
                            lines.push(format!(
                                "Variables not used in the template: {}",
                                report.unused_variables.join(", ")
                            ));
                        }
                        (!lines.is_empty()).then(|| view! {
                            <MessageBar intent=MessageBarIntent::Warning>
                                <ul class="warning-list">
                                    {lines.into_iter().map(|l| view! { <li>{l}</li> }).collect_view()}
                                </ul>
                            </MessageBar>
                        })
                    }}
                </Card>

                <Card>
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h3 class="card__title">"Variables"</h3>
                        <Space>
                            <Button appearance=ButtonAppearance::Secondary size=ButtonSize::Small on_click=handle_add_missing>
                                "Add from template"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary size=ButtonSize::Small on_click=move |_| vm.add_variable("")>
                                {icon("plus")}
                                " Add"
                            </Button>
                        </Space>
                    </Flex>
                    <For
                        each=move || vm.variables.get()
                        key=|row| row.id
                        children=move |row| view! { <VariableRow row=row vm=vm /> }
                    />
                </Card>
            </div>
        </PageFrame>
    }
    .into_any()
}
