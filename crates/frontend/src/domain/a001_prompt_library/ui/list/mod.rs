use crate::app::use_app;
use crate::domain::a001_prompt_library::api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::export::download_json;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_prompt_library::normalizer::use_case_to_persisted;
use contracts::domain::a001_prompt_library::search::{SearchQuery, SearchSort, UseCaseHit};
use contracts::shared::navigation::NavAction;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeSet;
use thaw::*;

const PREVIEW_CHARS: usize = 90;

fn preview(template: &str) -> String {
    let flat = template.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        format!("{}…", flat.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        flat
    }
}

/// Список use case: поиск по тексту, фильтр по тегам, сортировка
#[component]
pub fn UseCaseLibrary(family: Option<String>) -> impl IntoView {
    let ctx = use_app();
    let family = StoredValue::new(family);

    let (hits, set_hits) = signal::<Vec<UseCaseHit>>(Vec::new());
    let (all_tags, set_all_tags) = signal::<Vec<String>>(Vec::new());
    let search_text = RwSignal::new(String::new());
    let selected_tags = RwSignal::new(BTreeSet::<String>::new());
    let sort = RwSignal::new(SearchSort::Name.as_str().to_string());
    // Инкремент перезапускает поиск после изменений
    let refresh = RwSignal::new(0u32);

    spawn_local(async move {
        match api::fetch_tags().await {
            Ok(tags) => set_all_tags.set(tags),
            Err(e) => log::warn!("Cannot load tags: {}", e),
        }
    });

    Effect::new(move |_| {
        refresh.track();
        let query = SearchQuery {
            family: family.get_value(),
            text: search_text.get(),
            tags: selected_tags.get(),
            sort: SearchSort::from_str(&sort.get()),
        };
        spawn_local(async move {
            match api::search(&query).await {
                Ok(v) => set_hits.set(v),
                Err(e) => ctx.error(format!("Search failed: {}", e)),
            }
        });
    });

    let toggle_tag = move |tag: String| {
        selected_tags.update(|tags| {
            if !tags.remove(&tag) {
                tags.insert(tag);
            }
        });
    };

    let handle_duplicate = move |family: String, name: String| {
        spawn_local(async move {
            match api::duplicate_use_case(&family, &name, None).await {
                Ok(resp) => {
                    ctx.report(resp.message, resp.persist_warning);
                    refresh.update(|n| *n += 1);
                }
                Err(e) => ctx.error(e),
            }
        });
    };

    let handle_delete = move |family: String, name: String| {
        let confirmed = web_sys::window()
            .and_then(|win| {
                win.confirm_with_message(&format!("Delete use case '{}'?", name))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_use_case(&family, &name).await {
                Ok(resp) => {
                    ctx.report(resp.message, resp.persist_warning);
                    refresh.update(|n| *n += 1);
                }
                Err(e) => ctx.error(e),
            }
        });
    };

    let handle_export = move |hit: UseCaseHit| {
        let mut doc = serde_json::Map::new();
        doc.insert(hit.name.clone(), use_case_to_persisted(&hit.config));
        let filename = format!("{}_{}.json", hit.family, hit.name).replace(' ', "_");
        if let Err(e) = download_json(&serde_json::Value::Object(doc), &filename) {
            ctx.error(format!("Export failed: {}", e));
        }
    };

    let title = family
        .get_value()
        .map(|f| format!("Use cases: {}", f))
        .unwrap_or_else(|| "All use cases".to_string());

    view! {
        <PageFrame page_id="a001_prompt_library--list" category=PAGE_CAT_LIST>
            <PageHeader title=title>
                <Space>
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=family.get_value().is_none()
                        on_click=move |_| ctx.dispatch(NavAction::NewUseCase)
                    >
                        {icon("plus")}
                        " New use case"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| ctx.dispatch(NavAction::OpenInject)>
                        {icon("upload")}
                        " Inject JSON"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| refresh.update(|n| *n += 1)>
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </Space>
            </PageHeader>

            <div class="page__content">
                <div class="filter-panel">
                    <Input value=search_text placeholder="Search name, template, variables..." />
                    <Select value=sort>
                        <option value="name">"Name"</option>
                        <option value="most_used">"Most used"</option>
                        <option value="recently_updated">"Recently updated"</option>
                    </Select>
                </div>

                <div class="tag-chips">
                    <For
                        each=move || all_tags.get()
                        key=|tag| tag.clone()
                        children=move |tag| {
                            let tag_for_check = tag.clone();
                            let tag_for_click = tag.clone();
                            let is_active = move || selected_tags.with(|t| t.contains(&tag_for_check));
                            view! {
                                <button
                                    class=move || if is_active() { "tag-chip tag-chip--active" } else { "tag-chip" }
                                    on:click=move |_| toggle_tag(tag_for_click.clone())
                                >
                                    {tag}
                                </button>
                            }
                        }
                    />
                </div>

                <Show
                    when=move || !hits.get().is_empty()
                    fallback=|| view! { <div class="empty-state">"Nothing found."</div> }
                >
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=true min_width=200.0>"Use case"</TableHeaderCell>
                                <TableHeaderCell resizable=true min_width=140.0>"Family"</TableHeaderCell>
                                <TableHeaderCell resizable=true min_width=300.0>"Template"</TableHeaderCell>
                                <TableHeaderCell min_width=140.0>"Tags"</TableHeaderCell>
                                <TableHeaderCell min_width=70.0>"Used"</TableHeaderCell>
                                <TableHeaderCell min_width=200.0>"Actions"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || hits.get()
                                key=|hit| (hit.family.clone(), hit.name.clone(), hit.config.metadata.updated_at, hit.config.usage_count)
                                children=move |hit| {
                                    let fam = hit.family.clone();
                                    let name = hit.name.clone();
                                    let (f1, n1) = (fam.clone(), name.clone());
                                    let (f2, n2) = (fam.clone(), name.clone());
                                    let (f3, n3) = (fam.clone(), name.clone());
                                    let (f4, n4) = (fam.clone(), name.clone());
                                    let (f5, n5) = (fam.clone(), name.clone());
                                    let hit_for_export = hit.clone();
                                    let tags = hit.config.tags.iter().cloned().collect::<Vec<_>>().join(", ");
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="link"
                                                        on:click=move |e| {
                                                            e.prevent_default();
                                                            ctx.dispatch(NavAction::OpenGenerator { family: f1.clone(), use_case: n1.clone() });
                                                        }
                                                    >
                                                        {name}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell><TableCellLayout>{fam}</TableCellLayout></TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class="template-preview">{preview(&hit.config.template)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell><TableCellLayout>{tags}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{hit.config.usage_count}</TableCellLayout></TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Space>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Generate"
                                                            on_click=move |_| ctx.dispatch(NavAction::OpenGenerator { family: f2.clone(), use_case: n2.clone() })
                                                        >
                                                            {icon("play")}
                                                        </Button>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Edit"
                                                            on_click=move |_| ctx.dispatch(NavAction::EditUseCase { family: f3.clone(), use_case: n3.clone() })
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Duplicate"
                                                            on_click=move |_| handle_duplicate(f4.clone(), n4.clone())
                                                        >
                                                            {icon("copy")}
                                                        </Button>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Export"
                                                            on_click=move |_| handle_export(hit_for_export.clone())
                                                        >
                                                            {icon("download")}
                                                        </Button>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Delete"
                                                            on_click=move |_| handle_delete(f5.clone(), n5.clone())
                                                        >
                                                            {icon("delete")}
                                                        </Button>
                                                    </Space>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </Show>
            </div>
        </PageFrame>
    }
}
