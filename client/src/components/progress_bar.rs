//! Horizontal progress bar.

#[cfg(test)]
#[path = "progress_bar_test.rs"]
mod progress_bar_test;

use leptos::prelude::*;

/// Inline style for the filled part; values above 100 are clamped.
pub fn fill_style(percent: u8, color: Option<&str>) -> String {
    let width = percent.min(100);
    match color {
        Some(color) => format!("width: {width}%; background-color: {color}"),
        None => format!("width: {width}%"),
    }
}

#[component]
pub fn ProgressBar(
    #[prop(into)] value: Signal<u8>,
    #[prop(optional, into)] color: Option<String>,
    #[prop(optional)] show_label: bool,
) -> impl IntoView {
    let style = move || fill_style(value.get(), color.as_deref());
    view! {
        <div class="progress">
            <div
                class="progress__track"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=move || value.get().to_string()
            >
                <div class="progress__fill" style=style></div>
            </div>
            <Show when=move || show_label>
                <span class="progress__label">{move || format!("{}%", value.get().min(100))}</span>
            </Show>
        </div>
    }
}
