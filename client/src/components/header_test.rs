use super::*;

#[test]
fn theme_toggle_cycles_through_all_preferences() {
    let mut theme = ThemePreference::Light;
    let mut seen = Vec::new();
    for _ in 0..3 {
        theme = next_theme(theme);
        seen.push(theme);
    }
    assert_eq!(seen, vec![ThemePreference::Dark, ThemePreference::Auto, ThemePreference::Light]);
}

#[test]
fn each_theme_has_an_icon() {
    assert_eq!(theme_icon(ThemePreference::Dark), "☾");
}
