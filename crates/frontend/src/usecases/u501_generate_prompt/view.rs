use super::api;
use super::form::{collect_values, initial_value};
use crate::app::use_app;
use crate::domain::a001_prompt_library::api as library_api;
use crate::shared::clipboard::copy_to_clipboard;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::ui;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::domain::a001_prompt_library::aggregate::{VariableSpec, VariableType};
use contracts::shared::navigation::{Banner, NavAction};
use contracts::usecases::u501_generate_prompt::GenerateRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Card, Checkbox, Space};

/// Поле формы по типу переменной
fn field_view(spec: VariableSpec, value: RwSignal<String>) -> AnyView {
    let id = format!("var-{}", spec.name);
    let label = spec.display_label().to_string();
    let help = spec.help.clone().unwrap_or_default();
    match spec.var_type {
        VariableType::Text => view! {
            <ui::Input id=id label=label value=value help=help />
        }
        .into_any(),
        VariableType::Textarea => view! {
            <ui::Textarea id=id label=label value=value height=Some(spec.effective_height()) help=help />
        }
        .into_any(),
        VariableType::Date => view! {
            <ui::Input id=id label=label value=value input_type="date" help=help />
        }
        .into_any(),
        VariableType::Number => view! {
            <ui::Input
                id=id
                label=label
                value=value
                input_type="number"
                min=spec.min
                max=spec.max
                step=spec.step
                help=help
            />
        }
        .into_any(),
        VariableType::Select => {
            let options = spec.options.clone();
            view! {
                <ui::Select id=id label=label value=value options=options help=help />
            }
            .into_any()
        }
    }
}

/// Форма генерации: одно поле на переменную, результат с копированием
#[component]
pub fn PromptGenerator(family: String, use_case: String) -> impl IntoView {
    let ctx = use_app();
    let fields = RwSignal::new(Vec::<(VariableSpec, RwSignal<String>)>::new());
    let template = RwSignal::new(String::new());
    let rendered = RwSignal::new(String::new());
    let usage_count = RwSignal::new(0u64);
    let strict = RwSignal::new(false);
    let is_generating = RwSignal::new(false);
    let names = StoredValue::new((family.clone(), use_case.clone()));

    spawn_local(async move {
        let (family, use_case) = names.get_value();
        match library_api::fetch_use_case(&family, &use_case).await {
            Ok(config) => {
                template.set(config.template.clone());
                usage_count.set(config.usage_count);
                fields.set(
                    config
                        .variables
                        .into_iter()
                        .map(|spec| {
                            let value = RwSignal::new(initial_value(&spec));
                            (spec, value)
                        })
                        .collect(),
                );
            }
            Err(e) => ctx.error(format!("Cannot load '{}': {}", use_case, e)),
        }
    });

    let handle_generate = move |_| {
        let (family, use_case) = names.get_value();
        let snapshot = fields.get();
        let values = collect_values(snapshot.iter().map(|(spec, value)| (spec, value.get())));
        let request = GenerateRequest {
            family,
            use_case,
            values,
            strict: strict.get(),
        };
        is_generating.set(true);
        spawn_local(async move {
            match api::generate(&request).await {
                Ok(resp) => {
                    rendered.set(resp.rendered);
                    usage_count.set(resp.usage_count);
                    match resp.warning {
                        Some(w) => ctx.show(Banner::warning(w)),
                        None => ctx.dispatch(NavAction::DismissBanner),
                    }
                }
                Err(e) => ctx.error(e),
            }
            is_generating.set(false);
        });
    };

    let handle_reset = move |_| {
        for (spec, value) in fields.get() {
            value.set(initial_value(&spec));
        }
        rendered.set(String::new());
    };

    let handle_copy = move |_| {
        copy_to_clipboard(
            &rendered.get(),
            move || ctx.success("Prompt copied to clipboard"),
            move |e| ctx.error(format!("Copy failed: {}", e)),
        );
    };

    let handle_edit = move |_| {
        let (family, use_case) = names.get_value();
        ctx.dispatch(NavAction::EditUseCase { family, use_case });
    };

    let title = format!("Generate: {}", use_case);
    let subtitle = Signal::derive(move || {
        format!("Family: {} · used {} time(s)", names.get_value().0, usage_count.get())
    });

    view! {
        <PageFrame page_id="u501_generate_prompt--usecase" category=PAGE_CAT_USECASE>
            <PageHeader title=title subtitle=subtitle>
                <Space>
                    <Button appearance=ButtonAppearance::Secondary on_click=handle_edit>
                        {icon("edit")}
                        " Edit"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenLibrary)>
                        {icon("close")}
                        " Close"
                    </Button>
                </Space>
            </PageHeader>

            <div class="page__content generator-layout">
                <Card>
                    <h3 class="card__title">"Fields"</h3>
                    <Show
                        when=move || !fields.get().is_empty()
                        fallback=|| view! { <div class="empty-state">"This template has no variables."</div> }
                    >
                        <For
                            each=move || fields.get()
                            key=|(spec, _)| spec.name.clone()
                            children=move |(spec, value)| field_view(spec, value)
                        />
                    </Show>

                    <details class="template-source">
                        <summary>"Template"</summary>
                        <pre>{move || template.get()}</pre>
                    </details>

                    <Space>
                        {view! { <Checkbox checked=strict label="Strict: fail on placeholders without a value" /> }.into_any()}
                    </Space>
                    <Space>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=handle_generate
                            disabled=is_generating
                        >
                            {icon("play")}
                            {move || if is_generating.get() { " Generating..." } else { " Generate" }}
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=handle_reset>
                            {icon("refresh")}
                            " Reset to defaults"
                        </Button>
                    </Space>
                </Card>

                <Card>
                    <h3 class="card__title">"Result"</h3>
                    <ui::Textarea value=rendered height=Some(420) readonly=true placeholder="Press Generate" />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=handle_copy
                        disabled=Signal::derive(move || rendered.get().is_empty())
                    >
                        {icon("copy")}
                        " Copy"
                    </Button>
                </Card>
            </div>
        </PageFrame>
    }
}
