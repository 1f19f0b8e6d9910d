//! Course, progress, profile and avatar data access.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call these functions from their loaders; each one issues one or more
//! table/RPC/storage calls through [`HostedClient`] and returns display-ready
//! records. Nothing is cached: every call is a fresh fetch.

#[cfg(test)]
#[path = "learning_test.rs"]
mod learning_test;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use super::error::BackendError;
use super::hosted::{HostedClient, StorageObject};
use super::query::Query;
use super::types::{
    Course, CourseRow, LearningStage, Question, Quiz, QuizAttempt, StageCompletion, UserProfile, UserStats,
};
use crate::state::course::apply_completions;
use crate::util::avatar::{AVATAR_BUCKET, PROBE_EXTENSIONS, cache_bust, object_path, probe_paths};
use crate::util::clock::now_millis;

#[derive(Deserialize)]
struct CompletionRow {
    stage_id: String,
}

/// Just enough of a `stages` row to attribute completions to courses.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StageRef {
    pub id: String,
    pub course_id: String,
}

// =============================================================================
// COURSES
// =============================================================================

pub fn courses_query() -> Query {
    Query::table("courses").select("*").order("name", true)
}

/// All courses, ordered by name.
///
/// # Errors
///
/// Backend or decode failures.
pub async fn fetch_courses(client: &HostedClient) -> Result<Vec<Course>, BackendError> {
    let rows: Vec<CourseRow> = client.select(&courses_query()).await?;
    Ok(rows.into_iter().map(|row| Course::from_row(row, 0)).collect())
}

/// All courses with the viewer's progress filled in. Anonymous viewers get
/// zero progress without the extra queries.
///
/// # Errors
///
/// Backend or decode failures of any of the three queries.
pub async fn fetch_courses_with_progress(
    client: &HostedClient,
    user_id: Option<&str>,
) -> Result<Vec<Course>, BackendError> {
    let Some(user_id) = user_id else {
        return fetch_courses(client).await;
    };
    let rows: Vec<CourseRow> = client.select(&courses_query()).await?;
    let stages: Vec<StageRef> = client.select(&Query::table("stages").select("id,course_id")).await?;
    let done: Vec<CompletionRow> = client.select(&completions_query(user_id)).await?;
    let ids: Vec<String> = done.into_iter().map(|row| row.stage_id).collect();
    let per_course = completed_per_course(&stages, &ids);
    Ok(rows
        .into_iter()
        .map(|row| {
            let completed = per_course.get(&row.id).copied().unwrap_or(0);
            Course::from_row(row, completed)
        })
        .collect())
}

/// Count completed stages per course id.
pub fn completed_per_course(stages: &[StageRef], completed_ids: &[String]) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for stage in stages.iter().filter(|s| completed_ids.contains(&s.id)) {
        *counts.entry(stage.course_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// # Errors
///
/// Backend or decode failures.
pub async fn fetch_course_by_slug(client: &HostedClient, slug: &str) -> Result<Option<Course>, BackendError> {
    let row: Option<CourseRow> = client.select_single(&Query::table("courses").select("*").eq("slug", slug)).await?;
    Ok(row.map(|row| Course::from_row(row, 0)))
}

// =============================================================================
// STAGES
// =============================================================================

pub fn stages_query(course_id: &str) -> Query {
    Query::table("stages").select("*").eq("course_id", course_id).order("position", true)
}

pub fn completions_query(user_id: &str) -> Query {
    Query::table("stage_completions").select("stage_id").eq("user_id", user_id)
}

/// Stages of a course in order, marked completed for `user_id`.
///
/// # Errors
///
/// Backend or decode failures of either query.
pub async fn fetch_stages(
    client: &HostedClient,
    course_id: &str,
    user_id: Option<&str>,
) -> Result<Vec<LearningStage>, BackendError> {
    let mut stages: Vec<LearningStage> = client.select(&stages_query(course_id)).await?;
    if let Some(user_id) = user_id {
        let done: Vec<CompletionRow> = client.select(&completions_query(user_id)).await?;
        let ids: Vec<String> = done.into_iter().map(|row| row.stage_id).collect();
        apply_completions(&mut stages, &ids);
    }
    Ok(stages)
}

/// Copy of `course` with progress taken from its loaded `stages`.
#[allow(clippy::cast_possible_truncation)]
pub fn with_stage_progress(course: Course, stages: &[LearningStage]) -> Course {
    let done = stages.iter().filter(|s| s.completed).count() as u32;
    let total = if stages.is_empty() { course.total_stages } else { stages.len() as u32 };
    let row = CourseRow {
        id: course.id,
        name: course.name,
        slug: course.slug,
        description: course.description,
        icon: course.icon,
        color: course.color,
        stages: total,
        difficulty: course.difficulty,
        duration: course.duration,
    };
    Course::from_row(row, done)
}

/// A course with its ordered stages, as the course, stage and quiz pages
/// show it.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseOutline {
    pub course: Course,
    pub stages: Vec<LearningStage>,
}

impl CourseOutline {
    #[must_use]
    pub fn stage(&self, stage_id: &str) -> Option<&LearningStage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// Mark a stage done locally after the backend accepted the write.
    pub fn complete(&mut self, stage_id: &str) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.id == stage_id) {
            stage.completed = true;
        }
        self.course = with_stage_progress(self.course.clone(), &self.stages);
    }
}

/// Course by slug plus its stages for `user_id`; `None` when the slug is
/// unknown.
///
/// # Errors
///
/// Backend or decode failures.
pub async fn fetch_course_outline(
    client: &HostedClient,
    slug: &str,
    user_id: Option<&str>,
) -> Result<Option<CourseOutline>, BackendError> {
    let Some(course) = fetch_course_by_slug(client, slug).await? else {
        return Ok(None);
    };
    let stages = fetch_stages(client, &course.id, user_id).await?;
    Ok(Some(CourseOutline { course: with_stage_progress(course, &stages), stages }))
}

/// Record that `user_id` finished `stage_id`. Repeating it is harmless.
///
/// # Errors
///
/// Backend failures.
pub async fn mark_stage_complete(client: &HostedClient, user_id: &str, stage_id: &str) -> Result<(), BackendError> {
    let row = StageCompletion { user_id: user_id.to_owned(), stage_id: stage_id.to_owned() };
    client.insert("stage_completions", &row, true).await
}

// =============================================================================
// QUIZZES
// =============================================================================

/// The quiz attached to a stage, with its questions in order.
///
/// # Errors
///
/// Backend or decode failures.
pub async fn fetch_quiz_for_stage(client: &HostedClient, stage_id: &str) -> Result<Option<Quiz>, BackendError> {
    let quiz: Option<Quiz> = client.select_single(&Query::table("quizzes").select("*").eq("stage_id", stage_id)).await?;
    let Some(mut quiz) = quiz else {
        return Ok(None);
    };
    let questions: Vec<Question> = client
        .select(&Query::table("questions").select("*").eq("quiz_id", &quiz.id).order("position", true))
        .await?;
    quiz.questions = questions;
    Ok(Some(quiz))
}

/// Store a submitted quiz; a passing attempt also completes the stage.
///
/// # Errors
///
/// Backend failures of either write.
pub async fn record_quiz_attempt(client: &HostedClient, attempt: &QuizAttempt, stage_id: &str) -> Result<(), BackendError> {
    client.insert("quiz_attempts", attempt, false).await?;
    if attempt.passed {
        mark_stage_complete(client, &attempt.user_id, stage_id).await?;
    }
    Ok(())
}

// =============================================================================
// PROFILE
// =============================================================================

/// # Errors
///
/// Backend or decode failures.
pub async fn get_user_stats(client: &HostedClient, user_id: &str) -> Result<UserStats, BackendError> {
    let value = client.rpc("get_user_stats", json!({ "user_uuid": user_id })).await?;
    UserStats::from_rpc(value).map_err(BackendError::Decode)
}

/// # Errors
///
/// Backend or decode failures.
pub async fn fetch_profile(client: &HostedClient, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
    client.select_single(&Query::table("profiles").select("*").eq("id", user_id)).await
}

/// Create or replace the profile row.
///
/// # Errors
///
/// Backend failures.
pub async fn save_profile(client: &HostedClient, profile: &UserProfile) -> Result<(), BackendError> {
    client.insert("profiles", profile, true).await
}

// =============================================================================
// AVATARS
// =============================================================================

/// Upload a validated avatar and return its cache-busted public URL.
///
/// # Errors
///
/// [`BackendError::Storage`] when the upload is rejected.
#[cfg(feature = "hydrate")]
pub async fn upload_avatar(
    client: &HostedClient,
    user_id: &str,
    file: &web_sys::File,
    ext: &str,
) -> Result<String, BackendError> {
    let path = object_path(user_id, ext);
    client.upload(AVATAR_BUCKET, &path, file, true).await?;
    // Drop copies stored under other extensions so lookup finds the new one.
    let stale: Vec<String> = probe_paths(user_id).into_iter().filter(|p| *p != path).collect();
    if let Err(e) = client.remove(AVATAR_BUCKET, &stale).await {
        log::warn!("could not remove stale avatars: {e}");
    }
    Ok(cache_bust(&client.public_url(AVATAR_BUCKET, &path), now_millis()))
}

/// Public URL of the user's avatar, if one is stored.
///
/// # Errors
///
/// [`BackendError::Storage`] when the bucket cannot be listed.
pub async fn get_avatar_url(client: &HostedClient, user_id: &str) -> Result<Option<String>, BackendError> {
    let objects = client.list(AVATAR_BUCKET, "", user_id).await?;
    Ok(stored_avatar_path(user_id, &objects).map(|path| cache_bust(&client.public_url(AVATAR_BUCKET, &path), now_millis())))
}

/// First probe path present in a bucket listing.
pub fn stored_avatar_path(user_id: &str, objects: &[StorageObject]) -> Option<String> {
    PROBE_EXTENSIONS
        .iter()
        .map(|ext| object_path(user_id, ext))
        .find(|path| objects.iter().any(|o| o.name == *path))
}

/// Remove every stored avatar for the user.
///
/// # Errors
///
/// [`BackendError::Storage`] when removal fails.
pub async fn delete_avatar(client: &HostedClient, user_id: &str) -> Result<(), BackendError> {
    client.remove(AVATAR_BUCKET, &probe_paths(user_id)).await
}
