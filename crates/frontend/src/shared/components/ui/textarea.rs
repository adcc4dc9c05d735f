use leptos::prelude::*;

/// Textarea component with label support and a fixed pixel height
#[component]
pub fn Textarea(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Textarea value
    value: RwSignal<String>,
    /// Placeholder text
    #[prop(optional, into)]
    placeholder: MaybeProp<String>,
    /// Height in px
    #[prop(optional_no_strip)]
    height: Option<u32>,
    /// Read-only output field
    #[prop(optional)]
    readonly: bool,
    /// Hint shown under the field
    #[prop(optional, into)]
    help: MaybeProp<String>,
    /// ID for the textarea element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let textarea_id = move || id.get().unwrap_or_default();
    let textarea_placeholder = move || placeholder.get().unwrap_or_default();
    let style = format!("height: {}px; width: 100%;", height.unwrap_or(100));

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=textarea_id>
                    {l}
                </label>
            })}
            <textarea
                id=textarea_id
                class="form__textarea"
                style=style
                placeholder=textarea_placeholder
                readonly=readonly
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {move || help.get().filter(|h| !h.is_empty()).map(|h| view! {
                <div class="form__help">{h}</div>
            })}
        </div>
    }
}
