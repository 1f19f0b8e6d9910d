//! Dismissible banner for success, error and info messages.

use leptos::prelude::*;

use crate::util::url_params::{Notice, NoticeKind};

#[component]
pub fn Notification(
    kind: NoticeKind,
    #[prop(optional, into)] title: Option<String>,
    #[prop(into)] message: String,
    #[prop(optional)] on_close: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class=format!("notification {}", kind.class()) role="status">
            <div class="notification__content">
                {title.map(|t| view! { <strong class="notification__title">{t}</strong> })}
                <p class="notification__message">{message}</p>
            </div>
            {on_close.map(|cb| {
                view! {
                    <button class="notification__close" aria-label="Dismiss" on:click=move |_| cb.run(())>
                        "✕"
                    </button>
                }
            })}
        </div>
    }
}

/// Render an optional notice held in a signal, with a close button that
/// clears it.
#[component]
pub fn NoticeSlot(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            view! {
                <Notification
                    kind=n.kind
                    title=n.title
                    message=n.message
                    on_close=Callback::new(move |()| notice.set(None))
                />
            }
        })
    }
}
