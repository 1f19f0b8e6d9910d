//! Site header with navigation, theme switch and account actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered once by the app shell. Which links show depends on the auth
//! snapshot; signing out goes through the hosted client, whose `SignedOut`
//! event updates every other observer.

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;

use crate::net::types::ThemePreference;
use crate::state::auth::AuthSnapshot;
use crate::util::services::use_services;
use crate::util::theme;

/// Next theme in the toggle cycle.
pub fn next_theme(current: ThemePreference) -> ThemePreference {
    match current {
        ThemePreference::Light => ThemePreference::Dark,
        ThemePreference::Dark => ThemePreference::Auto,
        ThemePreference::Auto => ThemePreference::Light,
    }
}

pub fn theme_icon(current: ThemePreference) -> &'static str {
    match current {
        ThemePreference::Light => "☀",
        ThemePreference::Dark => "☾",
        ThemePreference::Auto => "◐",
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let theme_pref = expect_context::<RwSignal<ThemePreference>>();
    let services = use_services();

    let signed_in = move || auth.with(|a| a.state.is_logged_in);
    let name = move || auth.with(|a| a.user().map(crate::net::types::User::display_name).unwrap_or_default());

    let on_theme = move |_| {
        let next = next_theme(theme_pref.get_untracked());
        theme::store(next);
        theme_pref.set(next);
    };

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        {
            if let Some(client) = crate::util::services::client_of(services) {
                leptos::task::spawn_local(async move {
                    if let Err(e) = client.sign_out().await {
                        log::warn!("sign out: {e}");
                    }
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/login");
                    }
                });
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = services;
        }
    };

    view! {
        <header class="site-header">
            <a class="site-header__brand" href="/">"Modular Learning"</a>
            <nav class="site-header__nav">
                <a href="/">"Home"</a>
                <a href="/courses">"Courses"</a>
                <Show when=signed_in>
                    <a href="/profile">"Profile"</a>
                </Show>
            </nav>
            <span class="site-header__spacer"></span>
            <button class="btn btn--ghost site-header__theme" title="Toggle theme" on:click=on_theme>
                {move || theme_icon(theme_pref.get())}
            </button>
            <Show
                when=signed_in
                fallback=move || {
                    view! {
                        <Show when=move || !auth.with(|a| a.loading)>
                            <a class="btn btn--outline" href="/login">"Sign In"</a>
                            <a class="btn btn--primary" href="/register">"Sign Up"</a>
                        </Show>
                    }
                }
            >
                <span class="site-header__user">{name}</span>
                <button class="btn btn--outline" on:click=on_sign_out>"Sign Out"</button>
            </Show>
        </header>
    }
}
