use crate::app::use_app;
use contracts::shared::navigation::{BannerKind, NavAction};
use leptos::prelude::*;
use thaw::*;

fn intent(kind: BannerKind) -> MessageBarIntent {
    match kind {
        BannerKind::Info => MessageBarIntent::Info,
        BannerKind::Success => MessageBarIntent::Success,
        BannerKind::Warning => MessageBarIntent::Warning,
        BannerKind::Error => MessageBarIntent::Error,
    }
}

/// Сообщение над текущим экраном (`NavState::banner`)
#[component]
pub fn BannerBar() -> impl IntoView {
    let ctx = use_app();
    let banner = Memo::new(move |_| ctx.nav.with(|s| s.banner.clone()));

    move || {
        banner.get().map(|b| {
            view! {
                <div class="banner-bar">
                    <MessageBar intent=intent(b.kind)>
                        <div style="display: flex; align-items: center; justify-content: space-between; gap: 12px; width: 100%;">
                            <span style="white-space: pre-wrap;">{b.message}</span>
                            <Button
                                appearance=ButtonAppearance::Transparent
                                size=ButtonSize::Small
                                on_click=move |_| ctx.dispatch(NavAction::DismissBanner)
                            >
                                "✕"
                            </Button>
                        </div>
                    </MessageBar>
                </div>
            }
        })
    }
}
