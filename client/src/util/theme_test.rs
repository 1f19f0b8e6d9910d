#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn explicit_preferences_ignore_system() {
    assert_eq!(resolve(ThemePreference::Light, true), "light");
    assert_eq!(resolve(ThemePreference::Dark, false), "dark");
}

#[test]
fn auto_follows_system() {
    assert_eq!(resolve(ThemePreference::Auto, true), "dark");
    assert_eq!(resolve(ThemePreference::Auto, false), "light");
}

#[test]
fn read_preference_defaults_to_light_off_browser() {
    assert_eq!(read_preference(), ThemePreference::Light);
}

#[test]
fn apply_and_store_are_callable_off_browser() {
    apply(ThemePreference::Dark);
    store(ThemePreference::Auto);
}
