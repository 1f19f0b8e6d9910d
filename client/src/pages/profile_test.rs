use super::*;
use crate::net::types::UserMetadata;
use crate::state::profile::SaveOutcome;

fn user(full_name: Option<&str>) -> User {
    User {
        id: "u-1".to_owned(),
        email: Some("ada@example.com".to_owned()),
        user_metadata: UserMetadata { full_name: full_name.map(str::to_owned) },
    }
}

#[test]
fn blank_profile_takes_name_from_signup_metadata() {
    let profile = blank_profile(&user(Some("Ada Lovelace")));
    assert_eq!(profile.id, "u-1");
    assert_eq!(profile.full_name, "Ada Lovelace");
    assert_eq!(profile.preferences, Preferences::default());
}

#[test]
fn blank_profile_without_metadata_has_empty_name() {
    assert_eq!(blank_profile(&user(None)).full_name, "");
}

#[test]
fn basic_info_edit_keeps_preferences_and_avatar() {
    let mut original = blank_profile(&user(Some("Ada")));
    original.avatar_url = Some("https://cdn.test/a.png".to_owned());
    original.preferences.language = "fr".to_owned();

    let edited = with_basic_info(&original, "  Ada King ");

    assert_eq!(edited.full_name, "Ada King");
    assert_eq!(edited.avatar_url, original.avatar_url);
    assert_eq!(edited.preferences.language, "fr");
}

#[test]
fn stats_labels() {
    let stats = UserStats { average_score: 84.6, ..UserStats::default() };
    assert_eq!(average_label(&stats), "85%");
    assert_eq!(ratio(18, 36), "18/36");
}

#[test]
fn save_notices_name_what_was_kept() {
    let saved = save_notice(&SaveOutcome::Saved).unwrap();
    assert_eq!((saved.kind, saved.title.as_str()), (NoticeKind::Success, "Profile Updated"));

    let pending = save_notice(&SaveOutcome::EmailPending).unwrap();
    assert!(pending.message.contains("confirm the change"));

    let email = save_notice(&SaveOutcome::EmailFailed("rate limited".to_owned())).unwrap();
    assert_eq!(email.kind, NoticeKind::Error);
    assert_eq!(email.title, "Email Not Changed");
    assert!(email.message.starts_with("Your other changes were saved"));
    assert!(email.message.ends_with("rate limited"));

    let failed = save_notice(&SaveOutcome::Failed("denied".to_owned())).unwrap();
    assert_eq!((failed.title.as_str(), failed.message.as_str()), ("Save Failed", "denied"));
}
