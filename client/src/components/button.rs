//! Button primitive with visual variants and a busy state.

#[cfg(test)]
#[path = "button_test.rs"]
mod button_test;

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Danger,
}

impl ButtonVariant {
    pub fn class(self) -> &'static str {
        match self {
            Self::Primary => "btn btn--primary",
            Self::Secondary => "btn btn--secondary",
            Self::Outline => "btn btn--outline",
            Self::Danger => "btn btn--danger",
        }
    }
}

/// Label shown on a button, swapped for `busy_label` while busy.
pub fn button_label<'a>(label: &'a str, busy_label: &'a str, busy: bool) -> &'a str {
    if busy { busy_label } else { label }
}

#[component]
pub fn Button(
    #[prop(into)] label: String,
    #[prop(optional)] variant: ButtonVariant,
    #[prop(default = "button")] kind: &'static str,
    #[prop(optional, into)] busy: Signal<bool>,
    #[prop(optional, into)] busy_label: Option<String>,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(optional)] full_width: bool,
    #[prop(optional)] on_click: Option<Callback<()>>,
) -> impl IntoView {
    let busy_label = busy_label.unwrap_or_else(|| "Loading...".to_owned());
    let text = move || button_label(&label, &busy_label, busy.get()).to_owned();
    view! {
        <button
            type=kind
            class=variant.class()
            class:btn--full=full_width
            class:btn--busy=move || busy.get()
            disabled=move || disabled.get() || busy.get()
            on:click=move |_| {
                if let Some(cb) = on_click.as_ref() {
                    cb.run(());
                }
            }
        >
            {text}
        </button>
    }
}
