use futures::executor::block_on;

use super::*;
use crate::config::BackendConfig;
use crate::net::types::StageKind;

fn course(total: u32) -> Course {
    Course::from_row(
        CourseRow {
            id: "c-1".to_owned(),
            name: "Rust".to_owned(),
            slug: "rust".to_owned(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            stages: total,
            difficulty: "Beginner".to_owned(),
            duration: "4 weeks".to_owned(),
        },
        0,
    )
}

fn stage(id: &str, completed: bool) -> LearningStage {
    LearningStage {
        id: id.to_owned(),
        course_id: "c-1".to_owned(),
        position: 0,
        title: id.to_owned(),
        kind: StageKind::Lesson,
        content: String::new(),
        video_url: None,
        duration_minutes: 5,
        completed,
    }
}

fn object(name: &str) -> StorageObject {
    StorageObject { name: name.to_owned(), id: None }
}

#[test]
fn courses_are_listed_by_name() {
    let pairs = courses_query().params().to_vec();
    assert!(pairs.contains(&("order".to_owned(), "name.asc".to_owned())));
}

#[test]
fn stages_query_filters_by_course_in_position_order() {
    let query = stages_query("c-1");
    assert_eq!(query.table_name(), "stages");
    assert!(query.params().contains(&("course_id".to_owned(), "eq.c-1".to_owned())));
    assert!(query.params().contains(&("order".to_owned(), "position.asc".to_owned())));
}

#[test]
fn completions_query_selects_stage_ids_for_user() {
    let query = completions_query("u-1");
    assert_eq!(
        query.params(),
        &[("select".to_owned(), "stage_id".to_owned()), ("user_id".to_owned(), "eq.u-1".to_owned())]
    );
}

#[test]
fn stage_progress_uses_loaded_stages() {
    let updated = with_stage_progress(course(10), &[stage("a", true), stage("b", false), stage("c", true), stage("d", false)]);

    assert_eq!(updated.total_stages, 4);
    assert_eq!(updated.completed_stages, 2);
    assert_eq!(updated.progress, 50);
    assert_eq!(updated.duration, "4 weeks");
}

#[test]
fn stage_progress_keeps_row_total_when_no_stages_loaded() {
    let updated = with_stage_progress(course(6), &[]);
    assert_eq!(updated.total_stages, 6);
    assert_eq!(updated.progress, 0);
}

#[test]
fn stored_avatar_path_follows_probe_order() {
    let listing = [object("u-1.png"), object("u-1.jpeg"), object("u-10.jpg")];
    assert_eq!(stored_avatar_path("u-1", &listing).as_deref(), Some("u-1.jpeg"));
    assert_eq!(stored_avatar_path("u-2", &listing), None);
}

#[test]
fn fetches_fail_as_unavailable_off_browser() {
    let client = HostedClient::new(BackendConfig::from_parts(Some("https://b.test"), Some("k")).unwrap());

    assert!(matches!(block_on(fetch_courses(&client)), Err(BackendError::Unavailable(_))));
    assert!(matches!(block_on(get_user_stats(&client, "u-1")), Err(BackendError::Unavailable(_))));
    assert!(matches!(block_on(get_avatar_url(&client, "u-1")), Err(BackendError::Unavailable(_))));
}

#[test]
fn completions_are_counted_per_course() {
    let stages = vec![
        StageRef { id: "a1".to_owned(), course_id: "a".to_owned() },
        StageRef { id: "a2".to_owned(), course_id: "a".to_owned() },
        StageRef { id: "b1".to_owned(), course_id: "b".to_owned() },
    ];
    let done = vec!["a1".to_owned(), "a2".to_owned(), "zz".to_owned()];

    let counts = completed_per_course(&stages, &done);

    assert_eq!(counts.get("a"), Some(&2));
    assert_eq!(counts.get("b"), None);
}

#[test]
fn completing_a_stage_updates_outline_progress() {
    let stages = vec![stage("s1", true), stage("s2", false)];
    let mut outline = CourseOutline { course: with_stage_progress(course(2), &stages), stages };
    assert_eq!(outline.course.progress, 50);

    outline.complete("s2");

    assert!(outline.stage("s2").is_some_and(|s| s.completed));
    assert_eq!(outline.course.progress, 100);
    assert_eq!(outline.course.completed_stages, 2);
}
