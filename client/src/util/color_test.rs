use super::*;

#[test]
fn parse_hex_rgb_accepts_short_and_long_forms() {
    assert_eq!(parse_hex_rgb("#fff"), Some((255, 255, 255)));
    assert_eq!(parse_hex_rgb(" #1E90FF "), Some((30, 144, 255)));
}

#[test]
fn parse_hex_rgb_rejects_malformed_values() {
    assert_eq!(parse_hex_rgb("1e90ff"), None);
    assert_eq!(parse_hex_rgb("#12345"), None);
    assert_eq!(parse_hex_rgb("#zzzzzz"), None);
    assert_eq!(parse_hex_rgb("#ééé"), None);
}

#[test]
fn course_accent_normalizes_or_falls_back() {
    assert_eq!(course_accent("#ABC"), "#aabbcc");
    assert_eq!(course_accent("blue"), DEFAULT_ACCENT);
    assert_eq!(course_accent(""), DEFAULT_ACCENT);
}

#[test]
fn avatar_color_is_stable_per_name() {
    assert_eq!(avatar_color("Ada Lovelace"), avatar_color("ada lovelace "));
    assert!(AVATAR_PALETTE.contains(&avatar_color("")));
}
