//! Loading and error placeholders shared by the page loaders.

use leptos::prelude::*;

#[component]
pub fn PageLoading(#[prop(default = "Loading...")] label: &'static str) -> impl IntoView {
    view! {
        <div class="page-status">
            <div class="spinner" aria-hidden="true"></div>
            <p>{label}</p>
        </div>
    }
}

/// Error panel with a link back to somewhere that works.
#[component]
pub fn PageError(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into)] href: String,
    #[prop(into)] link_label: String,
) -> impl IntoView {
    view! {
        <div class="page-status page-status--error">
            <h1>{title}</h1>
            <p>{message}</p>
            <a class="btn btn--primary" href=href>{link_label}</a>
        </div>
    }
}
