//! Theme preference persistence.
//!
//! Reads the user's theme from `localStorage` and applies it as a
//! `data-theme` attribute on the `<html>` element. `auto` follows the
//! system's `prefers-color-scheme`. Requires a browser environment; on the
//! server every call is a no-op.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::net::types::ThemePreference;

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "mls.theme";

/// Concrete `data-theme` value for `preference`.
pub fn resolve(preference: ThemePreference, system_dark: bool) -> &'static str {
    match preference {
        ThemePreference::Light => "light",
        ThemePreference::Dark => "dark",
        ThemePreference::Auto if system_dark => "dark",
        ThemePreference::Auto => "light",
    }
}

/// Stored preference, defaulting to light.
pub fn read_preference() -> ThemePreference {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|raw| ThemePreference::parse(&raw))
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        ThemePreference::default()
    }
}

fn system_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Set `data-theme` on `<html>`.
pub fn apply(preference: ThemePreference) {
    let theme = resolve(preference, system_prefers_dark());
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            let _ = el.set_attribute("data-theme", theme);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = theme;
    }
}

/// Apply `preference` and remember it for the next visit.
pub fn store(preference: ThemePreference) {
    apply(preference);
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(STORAGE_KEY, preference.as_str());
        }
    }
}
