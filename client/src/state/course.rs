//! Course outline and stage navigation logic.
//!
//! DESIGN
//! ======
//! Everything here is pure so the course page, the stage page and the course
//! listing can share it and tests can exercise it without a browser.

#[cfg(test)]
#[path = "course_test.rs"]
mod course_test;

use crate::net::types::{Course, LearningStage, StageKind};

/// `done / total` as a whole percentage. Zero when `total` is zero, never
/// above 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (f64::from(done) / f64::from(total) * 100.0).round();
    ratio.clamp(0.0, 100.0) as u8
}

// =============================================================================
// LISTING FILTER
// =============================================================================

/// Difficulty filter on the course listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    All,
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [Self::All, Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub fn matches(self, difficulty: &str) -> bool {
        self == Self::All || difficulty.trim().eq_ignore_ascii_case(self.label())
    }
}

#[must_use]
pub fn filter_courses(courses: &[Course], difficulty: Difficulty) -> Vec<Course> {
    courses.iter().filter(|c| difficulty.matches(&c.difficulty)).cloned().collect()
}

// =============================================================================
// OUTLINE
// =============================================================================

/// Mark each stage completed when its id is in `completed_ids`.
pub fn apply_completions(stages: &mut [LearningStage], completed_ids: &[String]) {
    for stage in stages {
        stage.completed = completed_ids.iter().any(|id| *id == stage.id);
    }
}

/// Status shown beside each item in the course outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlineStatus {
    Completed,
    NotStarted,
    Locked,
}

impl OutlineStatus {
    #[must_use]
    pub fn of(stage: &LearningStage) -> Self {
        if stage.completed {
            Self::Completed
        } else if stage.kind == StageKind::Quiz {
            Self::Locked
        } else {
            Self::NotStarted
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::NotStarted => "Not Started",
            Self::Locked => "Locked",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::NotStarted => "○",
            Self::Locked => "🔒",
        }
    }
}

/// First stage not yet completed.
#[must_use]
pub fn next_item(stages: &[LearningStage]) -> Option<&LearningStage> {
    stages.iter().find(|s| !s.completed)
}

#[must_use]
pub fn outline_summary(stages: &[LearningStage]) -> String {
    let done = stages.iter().filter(|s| s.completed).count();
    format!("{done} of {} items completed", stages.len())
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[must_use]
pub fn course_href(slug: &str) -> String {
    format!("/course/{slug}")
}

#[must_use]
pub fn stage_href(slug: &str, stage_id: &str) -> String {
    format!("/course/{slug}/stage/{stage_id}")
}

#[must_use]
pub fn quiz_href(slug: &str, stage_id: &str) -> String {
    format!("/course/{slug}/stage/{stage_id}/quiz")
}

/// Where a previous/next control leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavTarget {
    Stage(String),
    Course,
}

impl NavTarget {
    #[must_use]
    pub fn href(&self, slug: &str) -> String {
        match self {
            Self::Stage(id) => stage_href(slug, id),
            Self::Course => course_href(slug),
        }
    }
}

/// Previous/next targets for the stage page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageNav {
    pub previous: NavTarget,
    pub next: NavTarget,
}

/// Neighbours of `current_id` in `stages` (ordered by position). A stage at
/// either end, or one not in the list, leads back to the course.
#[must_use]
pub fn stage_nav(stages: &[LearningStage], current_id: &str) -> StageNav {
    let Some(index) = stages.iter().position(|s| s.id == current_id) else {
        return StageNav { previous: NavTarget::Course, next: NavTarget::Course };
    };
    let target = |i: Option<usize>| {
        i.and_then(|i| stages.get(i)).map_or(NavTarget::Course, |s| NavTarget::Stage(s.id.clone()))
    };
    StageNav { previous: target(index.checked_sub(1)), next: target(Some(index + 1)) }
}

/// Where a stage sits in its course, for the "Stage N of M" header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagePosition {
    /// 1-based.
    pub number: u32,
    pub total: u32,
}

impl StagePosition {
    #[must_use]
    pub fn percent(self) -> u8 {
        percent(self.number, self.total)
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("Stage {} of {}", self.number, self.total)
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn stage_position(stages: &[LearningStage], current_id: &str) -> Option<StagePosition> {
    let index = stages.iter().position(|s| s.id == current_id)?;
    Some(StagePosition { number: index as u32 + 1, total: stages.len() as u32 })
}

/// Outline link for a stage: quizzes open the quiz runner directly.
#[must_use]
pub fn item_href(slug: &str, stage: &LearningStage) -> String {
    match stage.kind {
        StageKind::Lesson => stage_href(slug, &stage.id),
        StageKind::Quiz => quiz_href(slug, &stage.id),
    }
}

/// `(lessons, quizzes)` in an outline.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn kind_counts(stages: &[LearningStage]) -> (u32, u32) {
    let quizzes = stages.iter().filter(|s| s.kind == StageKind::Quiz).count() as u32;
    (stages.len() as u32 - quizzes, quizzes)
}
