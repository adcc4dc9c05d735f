use crate::app::use_app;
use crate::domain::a001_prompt_library::api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a001_prompt_library::dto::FamilySummary;
use contracts::shared::navigation::NavAction;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Выбор семейства, создание и удаление семейств
#[component]
pub fn FamilyPicker() -> impl IntoView {
    let ctx = use_app();
    let (families, set_families) = signal::<Vec<FamilySummary>>(Vec::new());
    let new_family = RwSignal::new(String::new());

    let fetch = move || {
        spawn_local(async move {
            match api::fetch_families().await {
                Ok(v) => set_families.set(v),
                Err(e) => ctx.error(format!("Cannot load families: {}", e)),
            }
        });
    };

    let handle_create = move |_| {
        let name = new_family.get().trim().to_string();
        if name.is_empty() {
            ctx.error("Family name is empty");
            return;
        }
        spawn_local(async move {
            match api::create_family(&name).await {
                Ok(resp) => {
                    new_family.set(String::new());
                    ctx.report(resp.message, resp.persist_warning);
                    fetch();
                }
                Err(e) => ctx.error(e),
            }
        });
    };

    let handle_delete = move |name: String| {
        let confirmed = web_sys::window()
            .and_then(|win| {
                win.confirm_with_message(&format!(
                    "Delete family '{}' with all its use cases?",
                    name
                ))
                .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        spawn_local(async move {
            match api::delete_family(&name).await {
                Ok(resp) => {
                    ctx.report(resp.message, resp.persist_warning);
                    fetch();
                }
                Err(e) => ctx.error(e),
            }
        });
    };

    fetch();

    view! {
        <PageFrame page_id="a001_prompt_library--families" category=PAGE_CAT_LIST>
            <PageHeader title="Families".to_string() subtitle="Pick a family to see its use cases".to_string()>
                <Space>
                    <Input value=new_family placeholder="New family name" />
                    <Button appearance=ButtonAppearance::Primary on_click=handle_create>
                        {icon("plus")}
                        " Create"
                    </Button>
                </Space>
            </PageHeader>

            <div class="page__content">
                <Show
                    when=move || !families.get().is_empty()
                    fallback=|| view! { <div class="empty-state">"No families yet. Create one or inject JSON."</div> }
                >
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=true min_width=240.0>"Family"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>"Use cases"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>"Generated"</TableHeaderCell>
                                <TableHeaderCell min_width=100.0>"Actions"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || families.get()
                                key=|f| f.name.clone()
                                children=move |family| {
                                    let name_for_select = family.name.clone();
                                    let name_for_delete = family.name.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="link"
                                                        on:click=move |e| {
                                                            e.prevent_default();
                                                            ctx.dispatch(NavAction::SelectFamily(name_for_select.clone()));
                                                        }
                                                    >
                                                        {icon("folder-open")}
                                                        " "
                                                        {family.name.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{family.use_cases}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{family.total_usage}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        size=ButtonSize::Small
                                                        on_click=move |_| handle_delete(name_for_delete.clone())
                                                    >
                                                        {icon("delete")}
                                                    </Button>
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
