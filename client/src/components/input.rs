//! Labelled text input bound to an `RwSignal<String>`.

use leptos::prelude::*;

#[component]
pub fn Input(
    #[prop(into)] label: String,
    #[prop(into)] name: String,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional, into)] autocomplete: Option<&'static str>,
    #[prop(optional)] required: bool,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let id = format!("field-{name}");
    view! {
        <div class="field">
            <label class="field__label" for=id.clone()>
                {label}
                {required.then_some(view! { <span class="field__required">" *"</span> })}
            </label>
            <input
                id=id
                class="field__input"
                name=name
                type=input_type
                placeholder=placeholder
                autocomplete=autocomplete
                required=required
                disabled=move || disabled.get()
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}
