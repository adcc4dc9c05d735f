use crate::routes::routes::AppRoutes;
use contracts::shared::navigation::{Banner, NavAction, NavState};
use leptos::prelude::*;

/// Глобальное состояние UI: какой экран открыт и какой баннер показан.
///
/// Все переходы идут через `dispatch`, который применяет `NavState::reduce`.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub nav: RwSignal<NavState>,
    /// JSON, переданный ассистентом на страницу вставки
    pub inject_draft: RwSignal<Option<String>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            nav: RwSignal::new(NavState::default()),
            inject_draft: RwSignal::new(None),
        }
    }

    pub fn dispatch(&self, action: NavAction) {
        log::debug!("nav: {:?}", action);
        self.nav.update(|state| {
            *state = std::mem::take(state).reduce(action);
        });
    }

    pub fn show(&self, banner: Banner) {
        self.dispatch(NavAction::ShowBanner(banner));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Banner::error(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Banner::success(message));
    }

    /// Успех с возможным предупреждением о несохранённых изменениях
    pub fn report(&self, message: impl Into<String>, persist_warning: Option<String>) {
        match persist_warning {
            Some(warning) => self.show(Banner::warning(format!(
                "{} Saved in memory only: {}",
                message.into(),
                warning
            ))),
            None => self.success(message),
        }
    }

    /// Текущее выбранное семейство (без подписки)
    pub fn family_untracked(&self) -> Option<String> {
        self.nav.with_untracked(|s| s.family.clone())
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext not found")
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext::new());

    view! {
        <AppRoutes />
    }
}
