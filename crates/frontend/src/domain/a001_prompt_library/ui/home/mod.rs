use crate::app::use_app;
use crate::domain::a001_prompt_library::api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::stat_card::StatCard;
use crate::shared::export::download_json;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use contracts::domain::a001_prompt_library::dto::{LoadSource, SyncStatus};
use contracts::shared::navigation::{Banner, NavAction};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn format_time(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Стартовая страница: статистика, состояние синхронизации, входы в разделы
#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app();
    let (status, set_status) = signal::<Option<SyncStatus>>(None);
    let (is_reloading, set_is_reloading) = signal(false);

    let load_status = move || {
        spawn_local(async move {
            match api::fetch_status().await {
                Ok(s) => set_status.set(Some(s)),
                Err(e) => ctx.error(format!("Cannot load library status: {}", e)),
            }
        });
    };

    let handle_reload = move |_| {
        set_is_reloading.set(true);
        spawn_local(async move {
            match api::reload_library().await {
                Ok(resp) if resp.ok => ctx.success(resp.message),
                Ok(resp) => ctx.show(Banner::warning(resp.message)),
                Err(e) => ctx.error(e),
            }
            set_is_reloading.set(false);
            load_status();
        });
    };

    let handle_export = move |_| {
        spawn_local(async move {
            match api::export_library().await {
                Ok(doc) => {
                    if let Err(e) = download_json(&doc, "prompt_library.json") {
                        ctx.error(format!("Export failed: {}", e));
                    }
                }
                Err(e) => ctx.error(format!("Export failed: {}", e)),
            }
        });
    };

    load_status();

    let stat = move |f: fn(&SyncStatus) -> u64| {
        Signal::derive(move || status.get().map(|s| f(&s)))
    };

    view! {
        <PageFrame page_id="a001_prompt_library--home" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Prompt library".to_string() subtitle="Form-driven prompt templates grouped by family".to_string()>
                <Space>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=handle_reload
                        disabled=is_reloading
                    >
                        {icon("refresh")}
                        {move || if is_reloading.get() { " Reloading..." } else { " Reload" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=handle_export>
                        {icon("download")}
                        " Export JSON"
                    </Button>
                </Space>
            </PageHeader>

            <div class="page__content">
                <div class="stat-grid">
                    <StatCard label="Families" icon_name="folder-open" value=stat(|s| s.stats.families as u64) />
                    <StatCard label="Use cases" icon_name="list" value=stat(|s| s.stats.use_cases as u64) />
                    <StatCard label="Prompts generated" icon_name="play" value=stat(|s| s.stats.total_usage) />
                </div>

                <Card>
                    <h3 class="card__title">"Storage"</h3>
                    {move || match status.get() {
                        None => view! { <div>"Loading..."</div> }.into_any(),
                        Some(s) => {
                            let source = match s.source {
                                LoadSource::Remote => "GitHub gist",
                                LoadSource::Defaults => "built-in defaults",
                            };
                            let warnings = (!s.load_warnings.is_empty()).then(|| {
                                let count = s.load_warnings.len();
                                let items = s
                                    .load_warnings
                                    .iter()
                                    .map(|w| view! { <li>{w.clone()}</li> })
                                    .collect_view();
                                view! {
                                    <details class="load-warnings">
                                        <summary>{format!("{} normalization warning(s)", count)}</summary>
                                        <ul>{items}</ul>
                                    </details>
                                }
                            });
                            view! {
                                <table class="kv-table">
                                    <tr>
                                        <td>"Remote sync"</td>
                                        <td>{if s.remote_enabled { "enabled" } else { "disabled (no GIST_ID / GITHUB_TOKEN)" }}</td>
                                    </tr>
                                    <tr><td>"Loaded from"</td><td>{source}</td></tr>
                                    <tr><td>"Last load"</td><td>{format_time(s.last_loaded_at)}</td></tr>
                                    <tr><td>"Last save"</td><td>{format_time(s.last_saved_at)}</td></tr>
                                    <tr>
                                        <td>"Last error"</td>
                                        <td class="text-error">{s.last_error.clone().unwrap_or_else(|| "—".to_string())}</td>
                                    </tr>
                                </table>
                                {warnings}
                            }
                                .into_any()
                        }
                    }}
                </Card>

                <div class="home-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| ctx.dispatch(NavAction::PickFamily)>
                        {icon("folder-open")}
                        " Choose family"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenLibrary)>
                        {icon("list")}
                        " Browse all use cases"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenInject)>
                        {icon("upload")}
                        " Inject JSON"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenAssistant)>
                        {icon("sparkles")}
                        " Prompt assistant"
                    </Button>
                </div>
            </div>
        </PageFrame>
    }
}
