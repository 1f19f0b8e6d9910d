use super::*;

#[test]
fn accepted_types_map_to_extensions() {
    assert_eq!(extension_for("image/jpeg"), Some("jpg"));
    assert_eq!(extension_for("image/jpg"), Some("jpg"));
    assert_eq!(extension_for("IMAGE/PNG"), Some("png"));
    assert_eq!(extension_for("image/webp"), Some("webp"));
    assert_eq!(extension_for("image/gif"), None);
}

#[test]
fn validate_rejects_wrong_type_before_size() {
    assert_eq!(validate("application/pdf", 10.0 * MAX_AVATAR_BYTES), Err(AvatarError::UnsupportedType));
}

#[test]
fn validate_enforces_two_megabytes() {
    assert_eq!(validate("image/png", MAX_AVATAR_BYTES), Ok("png"));
    assert_eq!(validate("image/png", MAX_AVATAR_BYTES + 1.0), Err(AvatarError::TooLarge));
    assert_eq!(AvatarError::TooLarge.to_string(), "File size must be less than 2MB");
}

#[test]
fn probe_paths_cover_every_extension() {
    assert_eq!(probe_paths("u-1"), vec!["u-1.jpg", "u-1.jpeg", "u-1.png", "u-1.webp"]);
}

#[test]
fn cache_bust_appends_timestamp() {
    assert_eq!(cache_bust("https://cdn/a.png", 42), "https://cdn/a.png?t=42");
    assert_eq!(cache_bust("https://cdn/a.png?x=1", 42), "https://cdn/a.png?x=1&t=42");
}

#[test]
fn fallback_uses_first_letter_or_u() {
    assert_eq!(fallback(Some("ada")).0, 'A');
    assert_eq!(fallback(Some("  ")).0, 'U');
    assert_eq!(fallback(None).0, 'U');
    assert_eq!(fallback(Some("Ada")).1, fallback(Some("Ada")).1);
}
