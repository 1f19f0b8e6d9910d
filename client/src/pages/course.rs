//! Course detail: header with stats and progress, then the stage outline.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::page_status::{PageError, PageLoading};
use crate::components::progress_bar::ProgressBar;
use crate::net::learning::{CourseOutline, fetch_course_outline};
use crate::net::types::StageKind;
use crate::state::auth::AuthSnapshot;
use crate::state::course::{OutlineStatus, item_href, kind_counts, next_item, outline_summary};
use crate::util::auth::{install_unauth_redirect, settled_user_id};
use crate::util::color::course_accent;
use crate::util::loader::{LoadState, Loader};
use crate::util::services::use_services;

#[component]
pub fn CoursePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let params = use_params_map();
    let outline = Loader::<CourseOutline>::new();

    let key = Memo::new(move |_| {
        let slug = params.with(|p| p.get("slug").unwrap_or_default());
        auth.with(settled_user_id).map(|user_id| (slug, user_id))
    });
    Effect::new(move || {
        let Some((slug, user_id)) = key.get() else {
            return;
        };
        outline.load_required(services, "Failed to load course", "Course not found", move |client| async move {
            fetch_course_outline(&client, &slug, user_id.as_deref()).await
        });
    });

    move || match outline.state.get() {
        LoadState::Loading => view! { <PageLoading label="Loading course..." /> }.into_any(),
        LoadState::Failed(message) => {
            view! { <PageError title="Course Unavailable" message=message href="/courses" link_label="All Courses" /> }
                .into_any()
        }
        LoadState::Ready(outline) => view! { <CourseDetail outline=outline /> }.into_any(),
    }
}

#[component]
fn CourseDetail(outline: CourseOutline) -> impl IntoView {
    let CourseOutline { course, stages } = outline;
    let accent = course_accent(&course.color);
    let (lessons, quizzes) = kind_counts(&stages);
    let summary = outline_summary(&stages);
    let next = next_item(&stages).map(|stage| item_href(&course.slug, stage));
    let slug = course.slug.clone();
    let empty = stages.is_empty();

    let rows = stages
        .iter()
        .map(|stage| {
            let status = OutlineStatus::of(stage);
            let href = item_href(&slug, stage);
            let (kind_label, kind_class) = match stage.kind {
                StageKind::Lesson => ("Lesson", "badge badge--lesson"),
                StageKind::Quiz => ("Quiz", "badge badge--quiz"),
            };
            let (action, action_class) = if stage.completed {
                ("Review", "btn btn--outline btn--sm")
            } else {
                ("Start", "btn btn--primary btn--sm")
            };
            view! {
                <li class="outline__item" class:outline__item--done=stage.completed>
                    <span class="outline__icon">{status.icon()}</span>
                    <div class="outline__text">
                        <span class="outline__title">{stage.title.clone()}</span>
                        <span class=kind_class>{kind_label}</span>
                        <span class="outline__status">{status.label()}</span>
                    </div>
                    <a class=action_class href=href>{action}</a>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="page course-page">
            <nav class="breadcrumbs">
                <a href="/courses">"Courses"</a>
                <span>"›"</span>
                <span>{course.name.clone()}</span>
            </nav>
            <section class="course-hero">
                <span class="course-hero__icon" style=format!("background-color: {accent}33")>{course.icon.clone()}</span>
                <div class="course-hero__body">
                    <h1>{course.name.clone()}</h1>
                    <p>{course.description.clone()}</p>
                    <dl class="course-hero__stats">
                        <div><dd>{course.difficulty.clone()}</dd><dt>"Difficulty"</dt></div>
                        <div><dd>{course.duration.clone()}</dd><dt>"Duration"</dt></div>
                        <div><dd>{lessons}</dd><dt>"Stages"</dt></div>
                        <div><dd>{quizzes}</dd><dt>"Quizzes"</dt></div>
                    </dl>
                    <div class="course-hero__progress">
                        <div class="course-hero__progress-head">
                            <span>"Overall Progress"</span>
                            <span>{format!("{}%", course.progress)}</span>
                        </div>
                        <ProgressBar value=Signal::stored(course.progress) color=accent.clone() />
                        <p>{summary}</p>
                    </div>
                    <div class="course-hero__actions">
                        {match next {
                            Some(href) => {
                                view! { <a class="btn btn--primary btn--lg" href=href>"Continue Learning"</a> }.into_any()
                            }
                            None => view! { <span class="btn btn--primary btn--lg btn--static">"Course Complete"</span> }.into_any(),
                        }}
                    </div>
                </div>
            </section>
            <section class="page__section">
                <h2>"Course Content"</h2>
                {empty.then(|| view! { <p class="page__empty">"This course has no stages yet."</p> })}
                <ol class="outline">{rows}</ol>
            </section>
        </div>
    }
}
