use super::*;

// =============================================================
// Helpers
// =============================================================

fn make_user(full_name: Option<&str>, email: Option<&str>) -> User {
    User {
        id: "u-1".to_owned(),
        email: email.map(ToOwned::to_owned),
        user_metadata: UserMetadata { full_name: full_name.map(ToOwned::to_owned) },
    }
}

fn make_course_row(stages: u32) -> CourseRow {
    CourseRow {
        id: "c-1".to_owned(),
        name: "Spanish Basics".to_owned(),
        slug: "spanish-basics".to_owned(),
        description: "Learn fundamental Spanish".to_owned(),
        icon: "🇪🇸".to_owned(),
        color: "#3B82F6".to_owned(),
        stages,
        difficulty: "Beginner".to_owned(),
        duration: "2 hours".to_owned(),
    }
}

// =============================================================
// User
// =============================================================

#[test]
fn display_name_prefers_full_name() {
    let user = make_user(Some("Ana Díaz"), Some("ana@example.com"));
    assert_eq!(user.display_name(), "Ana Díaz");
}

#[test]
fn display_name_falls_back_to_email_local_part() {
    let user = make_user(Some("   "), Some("ana@example.com"));
    assert_eq!(user.display_name(), "ana");
}

#[test]
fn display_name_defaults_to_generic_label() {
    assert_eq!(make_user(None, None).display_name(), "User");
}

#[test]
fn user_deserializes_without_metadata() {
    let user: User = serde_json::from_value(serde_json::json!({"id": "u-9", "email": "x@y.z"})).unwrap();
    assert_eq!(user.user_metadata, UserMetadata::default());
}

// =============================================================
// Session
// =============================================================

#[test]
fn session_stamped_derives_expires_at() {
    let session: Session = serde_json::from_value(serde_json::json!({
        "access_token": "a",
        "refresh_token": "r",
        "expires_in": 3600,
        "user": {"id": "u-1"}
    }))
    .unwrap();
    let session = session.stamped(1_000);
    assert_eq!(session.expires_at, Some(4_600));
    assert_eq!(session.token_type, "bearer");
}

#[test]
fn session_expiry_uses_safety_margin() {
    let session = Session {
        access_token: "a".to_owned(),
        refresh_token: "r".to_owned(),
        expires_in: 60,
        expires_at: Some(100),
        token_type: "bearer".to_owned(),
        user: make_user(None, None),
    };
    assert!(!session.is_expired(80));
    assert!(session.is_expired(90));
    assert!(session.is_expired(150));
}

#[test]
fn session_without_expiry_never_expires() {
    let session = Session {
        access_token: "a".to_owned(),
        refresh_token: "r".to_owned(),
        expires_in: 0,
        expires_at: None,
        token_type: "bearer".to_owned(),
        user: make_user(None, None),
    };
    assert!(!session.stamped(50).is_expired(i64::MAX));
}

// =============================================================
// Courses and stages
// =============================================================

#[test]
fn course_from_row_computes_progress() {
    let course = Course::from_row(make_course_row(8), 6);
    assert_eq!(course.progress, 75);
    assert_eq!(course.total_stages, 8);
    assert_eq!(course.completed_stages, 6);
    assert_eq!(course.slug, "spanish-basics");
}

#[test]
fn course_from_row_clamps_completed_to_total() {
    let course = Course::from_row(make_course_row(4), 9);
    assert_eq!(course.completed_stages, 4);
    assert_eq!(course.progress, 100);
}

#[test]
fn course_row_accepts_numeric_string_stage_count() {
    let row: CourseRow = serde_json::from_value(serde_json::json!({
        "id": "c-2",
        "name": "Math",
        "slug": "math",
        "stages": "10"
    }))
    .unwrap();
    assert_eq!(row.stages, 10);
    assert!(row.description.is_empty());
}

#[test]
fn stage_kind_parses_lowercase_and_defaults_to_lesson() {
    let stage: LearningStage = serde_json::from_value(serde_json::json!({
        "id": "s-1",
        "course_id": "c-1",
        "position": 1,
        "title": "Greetings"
    }))
    .unwrap();
    assert_eq!(stage.kind, StageKind::Lesson);
    assert!(!stage.completed);

    let kind: StageKind = serde_json::from_value(serde_json::json!("quiz")).unwrap();
    assert_eq!(kind, StageKind::Quiz);
}

#[test]
fn quiz_defaults_passing_score() {
    let quiz: Quiz = serde_json::from_value(serde_json::json!({
        "id": "q-1",
        "stage_id": "s-2",
        "title": "Greetings Quiz"
    }))
    .unwrap();
    assert_eq!(quiz.passing_score, DEFAULT_PASSING_SCORE);
    assert!(quiz.questions.is_empty());
}

// =============================================================
// Profile and stats
// =============================================================

#[test]
fn profile_flattens_preference_columns() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({
        "id": "u-1",
        "full_name": "John Doe",
        "avatar_url": null,
        "theme": "dark",
        "language": "es",
        "notifications": false
    }))
    .unwrap();
    assert_eq!(profile.preferences.theme, ThemePreference::Dark);
    assert_eq!(profile.preferences.language, "es");
    assert!(!profile.preferences.notifications);

    let back = serde_json::to_value(&profile).unwrap();
    assert_eq!(back["theme"], "dark");
    assert!(back.get("preferences").is_none());
}

#[test]
fn profile_missing_preferences_use_defaults() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({"id": "u-1"})).unwrap();
    assert_eq!(profile.preferences, Preferences::default());
    assert_eq!(profile.preferences.language, "en");
    assert!(profile.preferences.notifications);
}

#[test]
fn theme_preference_parse_matches_as_str() {
    for theme in [ThemePreference::Light, ThemePreference::Dark, ThemePreference::Auto] {
        assert_eq!(ThemePreference::parse(theme.as_str()), Some(theme));
    }
    assert_eq!(ThemePreference::parse("sepia"), None);
}

#[test]
fn stats_from_rpc_accepts_single_row_array() {
    let stats = UserStats::from_rpc(serde_json::json!([{
        "total_courses": 4,
        "completed_courses": 1,
        "total_stages": 36,
        "completed_stages": 18,
        "total_quizzes": 36,
        "completed_quizzes": 18,
        "average_score": "85.5"
    }]))
    .unwrap();
    assert_eq!(stats.total_courses, 4);
    assert_eq!(stats.completed_stages, 18);
    assert!((stats.average_score - 85.5).abs() < f64::EPSILON);
}

#[test]
fn stats_from_rpc_accepts_object_and_nulls() {
    let stats = UserStats::from_rpc(serde_json::json!({"total_courses": 2, "average_score": null})).unwrap();
    assert_eq!(stats.total_courses, 2);
    assert_eq!(stats.completed_courses, 0);
    assert!(stats.average_score.abs() < f64::EPSILON);
}

#[test]
fn stats_from_rpc_empty_array_is_default() {
    assert_eq!(UserStats::from_rpc(serde_json::json!([])).unwrap(), UserStats::default());
}

#[test]
fn stats_from_rpc_rejects_garbage() {
    assert!(UserStats::from_rpc(serde_json::json!({"total_courses": "many"})).is_err());
}
