//! Colour helpers for course accents and fallback avatars.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Accent used when a course row has no usable colour.
pub const DEFAULT_ACCENT: &str = "#3b82f6";

/// Background colours for letter avatars.
pub const AVATAR_PALETTE: [&str; 8] =
    ["#ef4444", "#f97316", "#eab308", "#22c55e", "#14b8a6", "#3b82f6", "#8b5cf6", "#ec4899"];

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some((channel(&hex[0..1].repeat(2))?, channel(&hex[1..2].repeat(2))?, channel(&hex[2..3].repeat(2))?)),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// Course colour as canonical lowercase `#rrggbb`, or [`DEFAULT_ACCENT`].
pub fn course_accent(raw: &str) -> String {
    match parse_hex_rgb(raw) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => DEFAULT_ACCENT.to_owned(),
    }
}

/// Palette entry for `name`. The same name always gets the same colour.
pub fn avatar_color(name: &str) -> &'static str {
    let hash = name
        .trim()
        .to_lowercase()
        .bytes()
        .fold(0_u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    AVATAR_PALETTE[hash as usize % AVATAR_PALETTE.len()]
}
