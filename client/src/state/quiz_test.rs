use super::*;
use crate::net::types::StageKind;

fn question(id: &str, correct_index: usize) -> Question {
    Question {
        id: id.to_owned(),
        quiz_id: "q".to_owned(),
        position: 0,
        prompt: format!("Prompt {id}"),
        options: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
        correct_index,
        explanation: format!("Because {id}"),
    }
}

fn session(n: usize) -> QuizSession {
    QuizSession::new(Quiz {
        id: "q".to_owned(),
        stage_id: "s2".to_owned(),
        title: "Check".to_owned(),
        passing_score: 80,
        questions: (0..n).map(|i| question(&format!("q{i}"), i % 3)).collect(),
    })
}

fn answer_all(s: &mut QuizSession, picks: &[usize]) {
    for (i, pick) in picks.iter().enumerate() {
        s.select(*pick);
        if i + 1 < picks.len() {
            s.next();
        }
    }
}

fn stage(id: &str) -> LearningStage {
    LearningStage {
        id: id.to_owned(),
        course_id: "c".to_owned(),
        position: 0,
        title: id.to_owned(),
        kind: StageKind::Lesson,
        content: String::new(),
        video_url: None,
        duration_minutes: 0,
        completed: false,
    }
}

#[test]
fn cannot_advance_until_answered() {
    let mut s = session(3);
    assert!(!s.can_advance());
    s.next();
    assert_eq!(s.index(), 0);

    s.select(1);
    assert!(s.can_advance());
    s.next();
    assert_eq!(s.index(), 1);
}

#[test]
fn select_ignores_out_of_range_option() {
    let mut s = session(1);
    s.select(9);
    assert_eq!(s.selected(), None);
}

#[test]
fn previous_keeps_answers_and_stops_at_zero() {
    let mut s = session(2);
    s.select(2);
    s.next();
    s.previous();
    s.previous();

    assert_eq!(s.index(), 0);
    assert_eq!(s.selected(), Some(2));
}

#[test]
fn next_stops_at_last_question() {
    let mut s = session(2);
    answer_all(&mut s, &[0, 1]);
    s.next();
    assert_eq!(s.index(), 1);
    assert!(s.is_last());
}

#[test]
fn progress_is_position_over_total() {
    let mut s = session(4);
    assert_eq!(s.progress(), 25);
    s.select(0);
    s.next();
    assert_eq!(s.progress(), 50);
}

#[test]
fn submit_requires_every_answer() {
    let mut s = session(3);
    answer_all(&mut s, &[0, 1]);
    assert!(!s.can_submit());
    assert_eq!(s.submit(), None);
}

#[test]
fn perfect_score_passes() {
    let mut s = session(3);
    answer_all(&mut s, &[0, 1, 2]);

    let result = s.submit().unwrap();
    assert_eq!(result, QuizResult { correct: 3, total: 3, score: 100, passed: true });
}

#[test]
fn score_is_rounded_and_compared_to_passing_score() {
    let mut s = session(3);
    answer_all(&mut s, &[0, 1, 0]);

    let result = s.submit().unwrap();
    assert_eq!(result.score, 67);
    assert!(!result.passed);
}

#[test]
fn passing_score_boundary_is_inclusive() {
    let mut s = session(5);
    answer_all(&mut s, &[0, 1, 2, 0, 0]);

    let result = s.submit().unwrap();
    assert_eq!(result.score, 80);
    assert!(result.passed);
}

#[test]
fn answers_are_frozen_after_submit() {
    let mut s = session(1);
    s.select(0);
    s.submit();
    s.select(2);
    assert_eq!(s.selected(), Some(0));
}

#[test]
fn retake_resets_everything() {
    let mut s = session(2);
    answer_all(&mut s, &[0, 1]);
    s.submit();

    s.retake();

    assert_eq!(s.index(), 0);
    assert_eq!(s.result(), None);
    assert!(!s.can_submit());
}

#[test]
fn review_reports_each_answer() {
    let mut s = session(2);
    answer_all(&mut s, &[0, 2]);
    s.submit();

    let review = s.review();
    assert!(review[0].is_correct);
    assert_eq!(review[1].your_answer.as_deref(), Some("c"));
    assert_eq!(review[1].correct_answer, "b");
    assert!(!review[1].is_correct);
    assert_eq!(review[1].explanation, "Because q1");
}

#[test]
fn empty_quiz_cannot_be_submitted() {
    let mut s = session(0);
    assert!(s.is_empty());
    assert_eq!(s.progress(), 0);
    assert_eq!(s.submit(), None);
}

#[test]
fn continue_goes_to_next_stage_only_when_passed() {
    let stages = vec![stage("s1"), stage("s2"), stage("s3")];
    let passed = QuizResult { correct: 1, total: 1, score: 100, passed: true };
    let failed = QuizResult { passed: false, score: 0, correct: 0, total: 1 };

    assert_eq!(continue_target(passed, &stages, "s2"), NavTarget::Stage("s3".to_owned()));
    assert_eq!(continue_target(passed, &stages, "s3"), NavTarget::Course);
    assert_eq!(continue_target(failed, &stages, "s2"), NavTarget::Course);
}
