use leptos::prelude::*;

/// Select component with label support
#[component]
pub fn Select(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Current value
    value: RwSignal<String>,
    /// Options; value and label are the same string
    #[prop(into)]
    options: Signal<Vec<String>>,
    /// Hint shown under the field
    #[prop(optional, into)]
    help: MaybeProp<String>,
    /// ID for the select element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let select_id = move || id.get().unwrap_or_default();

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=select_id>
                    {l}
                </label>
            })}
            <select
                id=select_id
                class="form__select"
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                <For
                    each=move || options.get()
                    key=|opt| opt.clone()
                    children=move |opt| {
                        let opt_clone = opt.clone();
                        let is_selected = move || value.get() == opt_clone;
                        let opt_value = opt.clone();
                        view! {
                            <option value=opt_value selected=is_selected>
                                {opt}
                            </option>
                        }
                    }
                />
            </select>
            {move || help.get().filter(|h| !h.is_empty()).map(|h| view! {
                <div class="form__help">{h}</div>
            })}
        </div>
    }
}
