use crate::app::use_app;
use crate::domain::a001_prompt_library::ui::details::UseCaseEditor;
use crate::domain::a001_prompt_library::ui::family_picker::FamilyPicker;
use crate::domain::a001_prompt_library::ui::home::HomePage;
use crate::domain::a001_prompt_library::ui::list::UseCaseLibrary;
use crate::layout::Shell;
use crate::usecases::u501_generate_prompt::view::PromptGenerator;
use crate::usecases::u502_inject_json::view::InjectJsonPage;
use crate::usecases::u503_prompt_assistant::view::PromptAssistant;
use contracts::shared::navigation::ViewMode;
use leptos::prelude::*;

/// Рендерит ровно один экран по `NavState::view`.
///
/// Ключ включает семейство и use case, чтобы редактор и генератор
/// пересоздавались при открытии другой записи.
#[component]
pub fn AppRoutes() -> impl IntoView {
    let ctx = use_app();
    let screen = Memo::new(move |_| {
        ctx.nav.with(|s| (s.view, s.family.clone(), s.use_case.clone()))
    });

    view! {
        <Shell>
            {move || {
                let (view_mode, family, use_case) = screen.get();
                match view_mode {
                    ViewMode::Home => view! { <HomePage /> }.into_any(),
                    ViewMode::FamilyPicker => view! { <FamilyPicker /> }.into_any(),
                    ViewMode::Library => view! { <UseCaseLibrary family=family /> }.into_any(),
                    ViewMode::Editor => {
                        view! { <UseCaseEditor family=family use_case=use_case /> }.into_any()
                    }
                    ViewMode::Generator => match (family, use_case) {
                        (Some(family), Some(use_case)) => {
                            view! { <PromptGenerator family=family use_case=use_case /> }
                                .into_any()
                        }
                        _ => view! { <UseCaseLibrary family=None /> }.into_any(),
                    },
                    ViewMode::InjectJson => view! { <InjectJsonPage family=family /> }.into_any(),
                    ViewMode::Assistant => {
                        view! { <PromptAssistant family=family use_case=use_case /> }.into_any()
                    }
                }
            }}
        </Shell>
    }
}
