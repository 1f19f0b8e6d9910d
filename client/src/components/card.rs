//! Surface container used by every page.

use leptos::prelude::*;

#[component]
pub fn Card(
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    view! {
        <section class=format!("card {class}")>
            {title.map(|t| view! { <h2 class="card__title">{t}</h2> })}
            <div class="card__body">{children()}</div>
        </section>
    }
}
