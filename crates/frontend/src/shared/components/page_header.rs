use leptos::prelude::*;

/// Заголовок страницы: название, необязательный подзаголовок и кнопки справа
#[component]
pub fn PageHeader(
    #[prop(into)]
    title: Signal<String>,

    #[prop(optional, into)]
    subtitle: MaybeProp<String>,

    /// Кнопки действий (пустой фрагмент, если не нужны)
    children: Children,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page-header__text">
                <h1 class="page-header__title">{move || title.get()}</h1>
                {move || subtitle.get().filter(|s| !s.is_empty()).map(|s| view! {
                    <div class="page-header__subtitle">{s}</div>
                })}
            </div>
            <div class="page-header__actions">
                {children()}
            </div>
        </div>
    }
}
