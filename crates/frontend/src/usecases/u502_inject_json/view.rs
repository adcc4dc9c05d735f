use super::api;
use crate::app::use_app;
use crate::domain::a001_prompt_library::api as library_api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::shared::navigation::{Banner, NavAction};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_inject_json::{InjectJson, InjectReport, InjectRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const EXAMPLE: &str = r#"{
  "follow_up_email": {
    "template": "Write a {tone} follow-up email to {customer_name}.",
    "variables": [
      { "name": "customer_name", "label": "Customer", "type": "text" },
      { "name": "tone", "type": "select", "options": ["formal", "friendly"] }
    ],
    "tags": ["email"]
  }
}"#;

fn report_list(title: &'static str, class: &'static str, items: Vec<String>) -> impl IntoView {
    (!items.is_empty()).then(|| {
        view! {
            <div class=class>
                <h4>{format!("{} ({})", title, items.len())}</h4>
                <ul>{items.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}</ul>
            </div>
        }
    })
}

/// Вставка use case из JSON-объекта `{ "<name>": { "template": ..., ... } }`
#[component]
pub fn InjectJsonPage(family: Option<String>) -> impl IntoView {
    let ctx = use_app();
    let target_family = RwSignal::new(family.unwrap_or_default());
    let payload = RwSignal::new(ctx.inject_draft.get_untracked().unwrap_or_default());
    let overwrite = RwSignal::new(false);
    let report = RwSignal::new(None::<InjectReport>);
    let is_running = RwSignal::new(false);
    let (families, set_families) = signal::<Vec<String>>(Vec::new());

    ctx.inject_draft.set(None);

    spawn_local(async move {
        if let Ok(list) = library_api::fetch_families().await {
            set_families.set(list.into_iter().map(|f| f.name).collect());
        }
    });

    let handle_inject = move |_| {
        let family = target_family.get().trim().to_string();
        if family.is_empty() {
            ctx.error("Choose or type a target family");
            return;
        }
        let parsed = match serde_json::from_str::<serde_json::Value>(&payload.get()) {
            Ok(v) => v,
            Err(e) => {
                ctx.error(format!("Not valid JSON: {}", e));
                return;
            }
        };
        let request = InjectRequest {
            family,
            payload: parsed,
            overwrite: overwrite.get(),
        };
        is_running.set(true);
        spawn_local(async move {
            match api::inject(&request).await {
                Ok(result) => {
                    let summary = result.summary();
                    if let Some(warning) = result.persist_warning.clone() {
                        ctx.show(Banner::warning(format!("{}. Saved in memory only: {}", summary, warning)));
                    } else if result.added.is_empty() {
                        ctx.show(Banner::warning(summary));
                    } else {
                        ctx.success(summary);
                    }
                    report.set(Some(result));
                }
                Err(e) => {
                    report.set(None);
                    ctx.error(e);
                }
            }
            is_running.set(false);
        });
    };

    view! {
        <PageFrame page_id="u502_inject_json--usecase" category=PAGE_CAT_USECASE>
            <PageHeader title=InjectJson::display_name().to_string() subtitle=InjectJson::description().to_string()>
                <Space>
                    {view! {
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| payload.set(EXAMPLE.to_string())>
                            "Insert example"
                        </Button>
                    }.into_any()}
                </Space>
            </PageHeader>

            <div class="page__content">
                <Card>
                    <div class="form__group">
                        <label class="form__label">"Target family"</label>
                        <Input value=target_family placeholder="Marketing" />
                        <div class="tag-chips">
                            <For
                                each=move || families.get()
                                key=|f| f.clone()
                                children=move |name| {
                                    let for_click = name.clone();
                                    view! {
                                        <button class="tag-chip" on:click=move |_| target_family.set(for_click.clone())>
                                            {name}
                                        </button>
                                    }
                                }
                            />
                        </div>
                    </div>

                    <div class="form__group">
                        <label class="form__label">"JSON object: use case name → configuration"</label>
                        <Textarea
                            attr:style="min-height: 280px; font-family: monospace;"
                            value=payload
                            placeholder=EXAMPLE
                        />
                    </div>

                    <Checkbox checked=overwrite label="Overwrite use cases that already exist" />

                    <Space>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=handle_inject
                            disabled=is_running
                        >
                            {icon("upload")}
                            {move || if is_running.get() { " Injecting..." } else { " Inject" }}
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| {
                                let family = target_family.get().trim().to_string();
                                if !family.is_empty() {
                                    ctx.dispatch(NavAction::SelectFamily(family));
                                }
                            }
                        >
                            {icon("list")}
                            " Open family"
                        </Button>
                    </Space>
                </Card>

                {move || report.get().map(|r| view! {
                    <Card>
                        <h3 class="card__title">{r.summary()}</h3>
                        {report_list("Added", "report report--success", r.added.clone())}
                        {report_list("Rejected", "report report--error", r.failures.clone())}
                        {report_list("Adjusted during normalization", "report report--warning", r.warnings.clone())}
                    </Card>
                })}
            </div>
        </PageFrame>
    }
}
