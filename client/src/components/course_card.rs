//! Course summary card used on the home page and the course listing.

#[cfg(test)]
#[path = "course_card_test.rs"]
mod course_card_test;

use leptos::prelude::*;

use super::card::Card;
use super::progress_bar::ProgressBar;
use crate::net::types::Course;
use crate::state::course::course_href;
use crate::util::color::course_accent;

/// Primary action label: learners who have started see "Continue".
pub fn primary_action(course: &Course) -> &'static str {
    if course.completed_stages > 0 { "Continue" } else { "Start" }
}

pub fn completed_label(course: &Course) -> String {
    format!("{} of {} stages completed", course.completed_stages, course.total_stages)
}

/// Translucent tint behind the course icon.
pub fn icon_style(accent: &str) -> String {
    format!("background-color: {accent}33")
}

#[component]
pub fn CourseCard(
    course: Course,
    /// Show difficulty, duration and stage count.
    #[prop(optional)]
    details: bool,
) -> impl IntoView {
    let accent = course_accent(&course.color);
    let href = course_href(&course.slug);
    let progress = course.progress;
    let started = course.completed_stages > 0;
    let action = primary_action(&course);
    let completed = completed_label(&course);
    let Course { name, description, icon, difficulty, duration, total_stages, .. } = course;

    view! {
        <Card class="course-card">
            <div class="course-card__head">
                <span class="course-card__icon" style=icon_style(&accent)>{icon}</span>
                <div>
                    <h3 class="course-card__name">{name}</h3>
                    <p class="course-card__description">{description}</p>
                </div>
            </div>
            <Show when=move || details>
                <dl class="course-card__facts">
                    <dt>"Difficulty:"</dt>
                    <dd>{difficulty.clone()}</dd>
                    <dt>"Duration:"</dt>
                    <dd>{duration.clone()}</dd>
                    <dt>"Stages:"</dt>
                    <dd>{total_stages}</dd>
                </dl>
            </Show>
            <Show when=move || started || !details>
                <div class="course-card__progress">
                    <div class="course-card__progress-head">
                        <span>"Progress"</span>
                        <span>{format!("{progress}%")}</span>
                    </div>
                    <ProgressBar value=Signal::stored(progress) color=accent.clone() />
                    <p class="course-card__completed">{completed.clone()}</p>
                </div>
            </Show>
            <div class="course-card__actions">
                <a class="btn btn--primary btn--sm" href=href.clone()>{action}</a>
                <a class="btn btn--outline btn--sm" href=href.clone()>"Details"</a>
            </div>
        </Card>
    }
}
