use super::api;
use crate::app::{use_app, AppContext};
use crate::domain::a001_prompt_library::api as library_api;
use crate::shared::clipboard::copy_to_clipboard;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::ui;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::domain::a001_prompt_library::search::SearchQuery;
use contracts::shared::navigation::{Banner, NavAction};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u503_prompt_assistant::{
    extract_json_object, AssistantMode, MetaPromptRequest, MetaPromptResponse, PromptAssistant as PromptAssistantUseCase,
    TemplateSource,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const MODE_CREATE: &str = "create_new";
const MODE_IMPROVE: &str = "improve_existing";

fn parse_mode(value: &str) -> AssistantMode {
    if value == MODE_IMPROVE {
        AssistantMode::ImproveExisting
    } else {
        AssistantMode::CreateNew
    }
}

fn copy_with_banner(ctx: AppContext, text: String) {
    copy_to_clipboard(
        &text,
        move || ctx.success("Copied to clipboard"),
        move |e| ctx.error(format!("Copy failed: {}", e)),
    );
}

/// Передать JSON на страницу вставки в выбранное семейство
fn hand_off(ctx: AppContext, family: String, payload: &serde_json::Value) {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    ctx.inject_draft.set(Some(text));
    if !family.trim().is_empty() {
        ctx.dispatch(NavAction::SelectFamily(family.trim().to_string()));
    }
    ctx.dispatch(NavAction::OpenInject);
}

/// Мета-промпты: создание нового use case или улучшение существующего
#[component]
pub fn PromptAssistant(family: Option<String>, use_case: Option<String>) -> impl IntoView {
    let ctx = use_app();

    let mode = RwSignal::new(
        if use_case.is_some() { MODE_IMPROVE } else { MODE_CREATE }.to_string(),
    );
    let family_name = RwSignal::new(family.unwrap_or_default());
    let use_case_name = RwSignal::new(use_case.unwrap_or_default());
    let objective = RwSignal::new(String::new());
    let expected_output = RwSignal::new(String::new());
    let improvement_goals = RwSignal::new(String::new());
    let send_to_llm = RwSignal::new(false);
    let is_running = RwSignal::new(false);

    let response = RwSignal::new(None::<MetaPromptResponse>);
    let meta_prompt = RwSignal::new(String::new());
    let llm_reply = RwSignal::new(String::new());
    let pasted_reply = RwSignal::new(String::new());
    let (existing, set_existing) = signal::<Vec<String>>(Vec::new());

    let is_improve = Memo::new(move |_| parse_mode(&mode.get()) == AssistantMode::ImproveExisting);

    // Имена use case семейства для режима улучшения
    Effect::new(move |_| {
        let family = family_name.get().trim().to_string();
        if !is_improve.get() || family.is_empty() {
            set_existing.set(Vec::new());
            return;
        }
        let query = SearchQuery {
            family: Some(family),
            ..Default::default()
        };
        spawn_local(async move {
            match library_api::search(&query).await {
                Ok(hits) => set_existing.set(hits.into_iter().map(|h| h.name).collect()),
                Err(e) => log::warn!("Cannot list use cases: {}", e),
            }
        });
    });

    let handle_build = move |_| {
        let request = MetaPromptRequest {
            mode: parse_mode(&mode.get()),
            family: family_name.get().trim().to_string(),
            use_case_name: use_case_name.get().trim().to_string(),
            objective: objective.get(),
            expected_output: expected_output.get(),
            current_config: None,
            improvement_goals: improvement_goals.get(),
            send_to_llm: send_to_llm.get(),
        };
        if request.mode == AssistantMode::ImproveExisting && request.use_case_name.is_empty() {
            ctx.error("Choose the use case to improve");
            return;
        }
        is_running.set(true);
        spawn_local(async move {
            match api::build_meta_prompt(&request).await {
                Ok(resp) => {
                    meta_prompt.set(resp.meta_prompt.clone());
                    llm_reply.set(resp.llm_reply.clone().unwrap_or_default());
                    match &resp.warning {
                        Some(w) => ctx.show(Banner::warning(w.clone())),
                        None => ctx.dispatch(NavAction::DismissBanner),
                    }
                    response.set(Some(resp));
                }
                Err(e) => ctx.error(e),
            }
            is_running.set(false);
        });
    };

    let handle_extract = move |_| match extract_json_object(&pasted_reply.get()) {
        Some(payload) => hand_off(ctx, family_name.get(), &payload),
        None => ctx.error("No JSON object found in the pasted reply"),
    };

    view! {
        <PageFrame page_id="u503_prompt_assistant--usecase" category=PAGE_CAT_USECASE>
            <PageHeader title=PromptAssistantUseCase::display_name().to_string() subtitle=PromptAssistantUseCase::description().to_string()>
                {()}
            </PageHeader>

            <div class="page__content generator-layout">
                <Card>
                    <div class="form__group">
                        <label class="form__label">"Mode"</label>
                        <Select value=mode>
                            <option value=MODE_CREATE>{AssistantMode::CreateNew.label()}</option>
                            <option value=MODE_IMPROVE>{AssistantMode::ImproveExisting.label()}</option>
                        </Select>
                    </div>

                    <div class="form__group">
                        <label class="form__label">"Family"</label>
                        <Input value=family_name placeholder="Marketing" />
                    </div>

                    <div class="form__group">
                        <label class="form__label">"Use case name"</label>
                        <Input value=use_case_name placeholder="follow_up_email" />
                        <div class="tag-chips">
                            <For
                                each=move || existing.get()
                                key=|name| name.clone()
                                children=move |name| {
                                    let for_click = name.clone();
                                    view! {
                                        <button class="tag-chip" on:click=move |_| use_case_name.set(for_click.clone())>
                                            {name}
                                        </button>
                                    }
                                }
                            />
                        </div>
                    </div>

                    <Show
                        when=move || is_improve.get()
                        fallback=move || view! {
                            <ui::Textarea
                                label="Objective: what should the prompt achieve?"
                                value=objective
                                height=Some(120)
                            />
                        }
                    >
                        <ui::Textarea
                            label="Improvement goals"
                            value=improvement_goals
                            height=Some(120)
                            help="The current configuration is taken from the library"
                        />
                    </Show>

                    <ui::Textarea
                        label="Expected output"
                        value=expected_output
                        height=Some(100)
                        placeholder="A short email, a table, JSON..."
                    />

                    <Checkbox checked=send_to_llm label="Send to the configured LLM" />

                    <Button appearance=ButtonAppearance::Primary on_click=handle_build disabled=is_running>
                        {icon("sparkles")}
                        {move || if is_running.get() { " Working..." } else { " Build meta-prompt" }}
                    </Button>
                </Card>

                <Card>
                    <h3 class="card__title">"Meta-prompt"</h3>
                    {move || response.get().map(|r| {
                        let source = match r.template_source {
                            TemplateSource::File => "Template file",
                            TemplateSource::Builtin => "Built-in template (file missing)",
                        };
                        view! { <div class="form__help">{source}</div> }
                    })}
                    <ui::Textarea value=meta_prompt height=Some(300) readonly=true />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=Signal::derive(move || meta_prompt.get().is_empty())
                        on_click=move |_| copy_with_banner(ctx, meta_prompt.get())
                    >
                        {icon("copy")}
                        " Copy meta-prompt"
                    </Button>

                    <Show when=move || !llm_reply.get().is_empty()>
                        <h3 class="card__title">"Model reply"</h3>
                        <ui::Textarea value=llm_reply height=Some(240) readonly=true />
                    </Show>

                    {move || {
                        response
                            .get()
                            .and_then(|r| r.suggested_payload)
                            .map(|payload| {
                                let payload = StoredValue::new(payload);
                                view! {
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        on_click=move |_| hand_off(ctx, family_name.get(), &payload.get_value())
                                    >
                                        {icon("upload")}
                                        " Send suggestion to injection"
                                    </Button>
                                }
                            })
                    }}

                    <h3 class="card__title">"Reply from another chat"</h3>
                    <ui::Textarea
                        value=pasted_reply
                        height=Some(160)
                        placeholder="Paste the model's answer here"
                    />
                    <Button appearance=ButtonAppearance::Secondary on_click=handle_extract>
                        {icon("upload")}
                        " Extract JSON and inject"
                    </Button>
                </Card>
            </div>
        </PageFrame>
    }
}
