//! Avatar picker: shows the current image or a letter fallback and uploads a
//! newly chosen file to storage.

use leptos::prelude::*;

use crate::util::avatar;
use crate::util::services::use_services;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AvatarSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl AvatarSize {
    pub fn class(self) -> &'static str {
        match self {
            Self::Small => "avatar avatar--sm",
            Self::Medium => "avatar avatar--md",
            Self::Large => "avatar avatar--lg",
        }
    }
}

/// Round avatar image, or the first letter of `name` on a stable colour.
#[component]
pub fn Avatar(
    #[prop(into)] url: Signal<Option<String>>,
    #[prop(into)] name: Signal<String>,
    #[prop(optional)] size: AvatarSize,
) -> impl IntoView {
    move || match url.get() {
        Some(src) => view! { <img class=size.class() src=src alt=format!("{} avatar", name.get()) /> }.into_any(),
        None => {
            let n = name.get();
            let (letter, color) = avatar::fallback(Some(&n));
            view! {
                <span class=format!("{} avatar--fallback", size.class()) style=format!("background-color: {color}")>
                    {letter.to_string()}
                </span>
            }
            .into_any()
        }
    }
}

/// Avatar with upload and remove controls. `on_change` receives the new
/// public URL, or `None` after removal.
#[component]
pub fn AvatarUpload(
    #[prop(into)] user_id: String,
    #[prop(into)] url: Signal<Option<String>>,
    #[prop(into)] name: Signal<String>,
    on_change: Callback<Option<String>>,
    #[prop(optional)] size: AvatarSize,
) -> impl IntoView {
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let user_id = StoredValue::new(user_id);
    let services = use_services();

    let on_file = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast as _;

            let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            let ext = match avatar::validate(&file.type_(), file.size()) {
                Ok(ext) => ext,
                Err(e) => {
                    error.set(Some(e.to_string()));
                    return;
                }
            };
            let Some(client) = crate::util::services::client_of(services) else {
                return;
            };
            error.set(None);
            busy.set(true);
            let uid = user_id.get_value();
            leptos::task::spawn_local(async move {
                match crate::net::learning::upload_avatar(&client, &uid, &file, ext).await {
                    Ok(url) => on_change.run(Some(url)),
                    Err(e) => {
                        log::error!("avatar upload failed: {e}");
                        error.set(Some(e.to_string()));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (ev, user_id, services);
        }
    };

    let on_remove = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                return;
            };
            busy.set(true);
            let uid = user_id.get_value();
            leptos::task::spawn_local(async move {
                match crate::net::learning::delete_avatar(&client, &uid).await {
                    Ok(()) => on_change.run(None),
                    Err(e) => {
                        log::error!("avatar removal failed: {e}");
                        error.set(Some("Could not remove avatar".to_owned()));
                    }
                }
                busy.set(false);
            });
        }
    };

    view! {
        <div class="avatar-upload">
            <Avatar url=url name=name size=size />
            <label class="btn btn--outline avatar-upload__pick" class:btn--busy=move || busy.get()>
                {move || if busy.get() { "Uploading..." } else { "Change Photo" }}
                <input
                    type="file"
                    accept="image/jpeg,image/png,image/webp"
                    hidden=true
                    disabled=move || busy.get()
                    on:change=on_file
                />
            </label>
            <Show when=move || url.with(Option::is_some)>
                <button class="btn btn--ghost" disabled=move || busy.get() on:click=on_remove>
                    "Remove"
                </button>
            </Show>
            <Show when=move || error.with(Option::is_some)>
                <p class="field__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <p class="avatar-upload__hint">"JPG, PNG or WebP, up to 2MB"</p>
        </div>
    }
}
