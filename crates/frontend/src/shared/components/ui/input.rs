use leptos::prelude::*;

/// Input component with label support.
///
/// Used by the generator form, where the field type comes from the
/// variable spec: `text`, `date` or `number` (with optional bounds).
#[component]
pub fn Input(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Input value
    value: RwSignal<String>,
    /// Placeholder text
    #[prop(optional, into)]
    placeholder: MaybeProp<String>,
    /// Input type: "text" (default), "date", "number"
    #[prop(optional, into)]
    input_type: MaybeProp<String>,
    /// Numeric bounds and step for `type="number"`
    #[prop(optional_no_strip)]
    min: Option<f64>,
    #[prop(optional_no_strip)]
    max: Option<f64>,
    #[prop(optional_no_strip)]
    step: Option<f64>,
    /// Hint shown under the field
    #[prop(optional, into)]
    help: MaybeProp<String>,
    /// ID for the input element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let input_id = move || id.get().unwrap_or_default();
    let input_placeholder = move || placeholder.get().unwrap_or_default();
    let input_t = move || input_type.get().unwrap_or_else(|| "text".to_string());

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=input_id>
                    {l}
                </label>
            })}
            <input
                id=input_id
                class="form__input"
                type=input_t
                prop:value=move || value.get()
                placeholder=input_placeholder
                min=min.map(|v| v.to_string())
                max=max.map(|v| v.to_string())
                step=step.map(|v| v.to_string())
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {move || help.get().filter(|h| !h.is_empty()).map(|h| view! {
                <div class="form__help">{h}</div>
            })}
        </div>
    }
}
