//! TopHeader component - application top navigation bar.
//!
//! Each button dispatches a `NavAction`; the active view is highlighted.

use crate::app::use_app;
use crate::shared::icons::icon;
use contracts::shared::navigation::{NavAction, ViewMode};
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app();

    let current_view = Memo::new(move |_| ctx.nav.with(|s| s.view));
    let family = Memo::new(move |_| ctx.nav.with(|s| s.family.clone()));

    let nav_button = move |view: ViewMode, icon_name: &'static str, action: NavAction| {
        view! {
            <button
                class=move || {
                    if current_view.get() == view {
                        "top-header__nav-btn top-header__nav-btn--active"
                    } else {
                        "top-header__nav-btn"
                    }
                }
                on:click=move |_| ctx.dispatch(action.clone())
            >
                {icon(icon_name)}
                <span>{view.title()}</span>
            </button>
        }
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">"Prompt Forge"</span>
                {move || family.get().map(|f| view! {
                    <span class="top-header__family">{f}</span>
                })}
            </div>

            <nav class="top-header__actions">
                {nav_button(ViewMode::Home, "home", NavAction::GoHome)}
                {nav_button(ViewMode::FamilyPicker, "folder-open", NavAction::PickFamily)}
                {nav_button(ViewMode::Library, "list", NavAction::OpenLibrary)}
                {nav_button(ViewMode::InjectJson, "upload", NavAction::OpenInject)}
                {nav_button(ViewMode::Assistant, "sparkles", NavAction::OpenAssistant)}
            </nav>
        </div>
    }
}
