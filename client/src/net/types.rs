//! Records exchanged with the hosted backend.
//!
//! DESIGN
//! ======
//! Row types mirror the backend tables (`courses`, `stages`, `quizzes`,
//! `questions`, `profiles`, ...) so serde stays lossless; display-oriented
//! shapes such as [`Course`] are derived from rows on the client.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::state::course::percent;

// =============================================================================
// AUTH
// =============================================================================

/// An authenticated user as returned by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Account email, if the provider exposes one.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata captured at sign-up.
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    /// Name shown in headers and avatars: full name, then the local part of
    /// the email, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.user_metadata.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_owned();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .map_or_else(|| "User".to_owned(), ToOwned::to_owned)
    }
}

/// A token pair issued by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Seconds before expiry at which a session is treated as stale.
const EXPIRY_MARGIN_SECS: i64 = 10;

impl Session {
    /// Fill in `expires_at` from `expires_in` when the service omitted it.
    #[must_use]
    pub fn stamped(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now_secs + self.expires_in);
        }
        self
    }

    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| now_secs >= at - EXPIRY_MARGIN_SECS)
    }
}

// =============================================================================
// COURSES
// =============================================================================

/// Raw `courses` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    /// Number of stages in the course.
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub stages: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: String,
}

/// Course as displayed in listings and detail headers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    /// Completion percentage, 0-100.
    pub progress: u8,
    pub total_stages: u32,
    pub completed_stages: u32,
    pub difficulty: String,
    pub duration: String,
}

impl Course {
    #[must_use]
    pub fn from_row(row: CourseRow, completed_stages: u32) -> Self {
        let completed_stages = completed_stages.min(row.stages);
        Self {
            progress: percent(completed_stages, row.stages),
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            icon: row.icon,
            color: row.color,
            total_stages: row.stages,
            completed_stages,
            difficulty: row.difficulty,
            duration: row.duration,
        }
    }
}

/// Whether a stage is reading material or an assessment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    #[default]
    Lesson,
    Quiz,
}

/// A `stages` row: one unit of course content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningStage {
    pub id: String,
    pub course_id: String,
    /// Ordering within the course, ascending.
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub position: u32,
    pub title: String,
    #[serde(default)]
    pub kind: StageKind,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub duration_minutes: u32,
    /// Set on the client from the user's completion rows.
    #[serde(default, skip_serializing)]
    pub completed: bool,
}

// =============================================================================
// QUIZZES
// =============================================================================

pub const DEFAULT_PASSING_SCORE: u8 = 80;

fn default_passing_score() -> u8 {
    DEFAULT_PASSING_SCORE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub stage_id: String,
    pub title: String,
    /// Minimum score (percent) needed to pass.
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
    /// Filled in by a second query, ordered by `position`.
    #[serde(default, skip_serializing)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub position: u32,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the right answer.
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Row written when a learner finishes a stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCompletion {
    pub user_id: String,
    pub stage_id: String,
}

/// Row written when a learner submits a quiz.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub user_id: String,
    pub quiz_id: String,
    pub score: u8,
    pub passed: bool,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Colour scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Interface languages offered on the profile page: `(code, label)`.
pub const LANGUAGES: [(&str, &str); 4] = [("en", "English"), ("es", "Spanish"), ("fr", "French"), ("de", "German")];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_notifications() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self { theme: ThemePreference::default(), language: default_language(), notifications: default_notifications() }
    }
}

/// A `profiles` row. Preference columns are flattened into [`Preferences`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub preferences: Preferences,
}

/// Aggregates returned by the `get_user_stats` RPC.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub total_courses: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub completed_courses: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub total_stages: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub completed_stages: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub total_quizzes: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    pub completed_quizzes: u32,
    /// Mean quiz score in percent.
    #[serde(default, deserialize_with = "deserialize_f64_from_number")]
    pub average_score: f64,
}

impl UserStats {
    /// Parse the RPC payload, which is either a single object or a
    /// one-element array depending on how the function is declared.
    ///
    /// # Errors
    ///
    /// Returns a message when the payload has neither shape.
    pub fn from_rpc(value: serde_json::Value) -> Result<Self, String> {
        let row = match value {
            serde_json::Value::Array(mut rows) => {
                if rows.is_empty() {
                    return Ok(Self::default());
                }
                rows.swap_remove(0)
            }
            serde_json::Value::Null => return Ok(Self::default()),
            other => other,
        };
        serde_json::from_value(row).map_err(|e| e.to_string())
    }
}

// =============================================================================
// NUMERIC COERCION
// =============================================================================

/// Postgres `bigint`/`numeric` values arrive as JSON numbers or, for
/// `numeric`, sometimes as strings.
fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        serde_json::Value::Null => Some(0.0),
        _ => None,
    }
}

fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = number_from_value(&value).ok_or_else(|| D::Error::custom("expected number"))?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    if number.is_finite() && number.fract() == 0.0 && number >= 0.0 && number <= f64::from(u32::MAX) {
        return Ok(number as u32);
    }
    Err(D::Error::custom(format!("value {number} out of range for u32")))
}

fn deserialize_f64_from_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    number_from_value(&value)
        .filter(|n| n.is_finite())
        .ok_or_else(|| D::Error::custom("expected number"))
}
