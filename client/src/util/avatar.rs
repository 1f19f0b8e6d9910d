//! Avatar upload rules.
//!
//! Avatars live in the public `avatars` bucket as `<user_id>.<ext>`. Uploads
//! are validated here before any bytes leave the browser; lookup and removal
//! probe every extension an avatar may have been stored under.

#[cfg(test)]
#[path = "avatar_test.rs"]
mod avatar_test;

use super::color::avatar_color;

pub const AVATAR_BUCKET: &str = "avatars";

/// Largest accepted upload.
pub const MAX_AVATAR_BYTES: f64 = 2.0 * 1024.0 * 1024.0;

/// Extensions checked, in order, when looking an avatar up.
pub const PROBE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AvatarError {
    #[error("Only JPG, PNG, and WebP files are allowed")]
    UnsupportedType,
    #[error("File size must be less than 2MB")]
    TooLarge,
}

/// Storage extension for `mime`, if it is an accepted image type.
pub fn extension_for(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Check a selected file. `size` is in bytes, as reported by `File.size`.
///
/// # Errors
///
/// [`AvatarError::UnsupportedType`] or [`AvatarError::TooLarge`].
pub fn validate(mime: &str, size: f64) -> Result<&'static str, AvatarError> {
    let ext = extension_for(mime).ok_or(AvatarError::UnsupportedType)?;
    if size > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge);
    }
    Ok(ext)
}

pub fn object_path(user_id: &str, ext: &str) -> String {
    format!("{user_id}.{ext}")
}

/// Every path an avatar for `user_id` may be stored under.
pub fn probe_paths(user_id: &str) -> Vec<String> {
    PROBE_EXTENSIONS.iter().map(|ext| object_path(user_id, ext)).collect()
}

/// Append a `t=` query so browsers refetch a replaced image.
pub fn cache_bust(url: &str, millis: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={millis}")
}

/// Letter and background colour shown when there is no avatar image.
pub fn fallback(name: Option<&str>) -> (char, &'static str) {
    let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("User");
    let letter = name.chars().next().map_or('U', |c| c.to_uppercase().next().unwrap_or(c));
    (letter, avatar_color(name))
}
