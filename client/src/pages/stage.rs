//! Lesson page: markdown content, optional video, completion and
//! previous/next navigation within the course.

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::button::Button;
use crate::components::page_status::{PageError, PageLoading};
use crate::components::progress_bar::ProgressBar;
use crate::net::learning::{CourseOutline, fetch_course_outline};
use crate::net::types::{LearningStage, StageKind};
use crate::state::auth::AuthSnapshot;
use crate::state::course::{NavTarget, course_href, quiz_href, stage_nav, stage_position};
use crate::util::auth::{install_unauth_redirect, settled_user_id};
use crate::util::loader::{LoadState, Loader};
use crate::util::markdown::{duration_label, render_markdown_html};
use crate::util::services::use_services;

/// The quiz link is offered once a lesson is done, and always on quiz stages.
pub fn offers_quiz(stage: &LearningStage) -> bool {
    stage.completed || stage.kind == StageKind::Quiz
}

/// Embeddable video URL; anything but http(s) is ignored.
pub fn video_src(stage: &LearningStage) -> Option<&str> {
    stage
        .video_url
        .as_deref()
        .map(str::trim)
        .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
}

#[component]
pub fn StagePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let params = use_params_map();
    let outline = Loader::<CourseOutline>::new();
    let stage_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

    let key = Memo::new(move |_| {
        let slug = params.with(|p| p.get("slug").unwrap_or_default());
        auth.with(settled_user_id).map(|user_id| (slug, user_id))
    });
    Effect::new(move || {
        let Some((slug, user_id)) = key.get() else {
            return;
        };
        outline.load_required(services, "Failed to load lesson", "Course not found", move |client| async move {
            fetch_course_outline(&client, &slug, user_id.as_deref()).await
        });
    });

    let marking = RwSignal::new(false);
    let mark_error = RwSignal::new(None::<String>);
    let on_complete = Callback::new(move |stage_id: String| {
        let Some(user_id) = auth.with_untracked(|a| a.user().map(|u| u.id.clone())) else {
            return;
        };
        mark_error.set(None);
        marking.set(true);
        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                marking.set(false);
                return;
            };
            leptos::task::spawn_local(async move {
                match crate::net::learning::mark_stage_complete(&client, &user_id, &stage_id).await {
                    Ok(()) => outline.state.update(|state| {
                        if let Some(loaded) = state.ready_mut() {
                            loaded.complete(&stage_id);
                        }
                    }),
                    Err(e) => {
                        log::error!("mark stage complete failed: {e}");
                        mark_error.set(Some("Could not save your progress. Please try again.".to_owned()));
                    }
                }
                marking.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (user_id, stage_id);
        }
    });

    move || match outline.state.get() {
        LoadState::Loading => view! { <PageLoading label="Loading lesson..." /> }.into_any(),
        LoadState::Failed(message) => {
            view! { <PageError title="Lesson Unavailable" message=message href="/courses" link_label="All Courses" /> }
                .into_any()
        }
        LoadState::Ready(loaded) => {
            let id = stage_id.get();
            if loaded.stage(&id).is_none() {
                let back = course_href(&loaded.course.slug);
                return view! {
                    <PageError
                        title="Stage Not Found"
                        message="The stage you're looking for doesn't exist."
                        href=back
                        link_label="Back to Course"
                    />
                }
                .into_any();
            }
            view! {
                <StageDetail outline=loaded stage_id=id marking=marking mark_error=mark_error on_complete=on_complete />
            }
            .into_any()
        }
    }
}

#[component]
fn StageDetail(
    outline: CourseOutline,
    stage_id: String,
    marking: RwSignal<bool>,
    mark_error: RwSignal<Option<String>>,
    on_complete: Callback<String>,
) -> impl IntoView {
    let CourseOutline { course, stages } = outline;
    let Some(stage) = stages.iter().find(|s| s.id == stage_id).cloned() else {
        return ().into_any();
    };
    let slug = course.slug.clone();
    let nav = stage_nav(&stages, &stage_id);
    let position = stage_position(&stages, &stage_id);
    let percent = position.map_or(0, |p| p.percent());
    let next_href = match &nav.next {
        NavTarget::Stage(_) => Some(nav.next.href(&slug)),
        NavTarget::Course => None,
    };
    let is_first = nav.previous == NavTarget::Course;
    let video = video_src(&stage).map(ToOwned::to_owned);
    let body = render_markdown_html(&stage.content);
    let duration = duration_label(stage.duration_minutes);
    let complete_id = stage.id.clone();

    view! {
        <div class="page stage-page">
            <nav class="breadcrumbs">
                <a href=course_href(&slug)>{course.name.clone()}</a>
                <span>"›"</span>
                <span>{stage.title.clone()}</span>
            </nav>
            <header class="stage-header">
                <div>
                    <h1>{stage.title.clone()}</h1>
                    <div class="stage-header__meta">
                        {(!duration.is_empty()).then(|| view! { <span>{format!("Duration: {duration}")}</span> })}
                        {position.map(|p| view! { <span>{p.label()}</span> })}
                    </div>
                </div>
                <div class="stage-header__progress">
                    <span class="stage-header__progress-label">"Progress"</span>
                    <strong>{format!("{percent}%")}</strong>
                </div>
            </header>
            <ProgressBar value=Signal::stored(percent) />
            {video.map(|src| {
                view! {
                    <section class="lesson-video">
                        <h2>"Video Lesson"</h2>
                        <div class="lesson-video__frame">
                            <iframe
                                src=src
                                title=stage.title.clone()
                                allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                                allowfullscreen=true
                            ></iframe>
                        </div>
                    </section>
                }
            })}
            <article class="lesson-content" inner_html=body></article>
            <Show when=move || mark_error.with(Option::is_some)>
                <p class="form-error">{move || mark_error.get().unwrap_or_default()}</p>
            </Show>
            <div class="stage-actions">
                <div class="stage-actions__group">
                    <a class="btn btn--outline" class:btn--disabled=is_first href=nav.previous.href(&slug)>
                        "← Previous Stage"
                    </a>
                    <a class="btn btn--outline" href=course_href(&slug)>"Back to Course"</a>
                </div>
                <div class="stage-actions__group">
                    {if offers_quiz(&stage) {
                        view! { <a class="btn btn--primary" href=quiz_href(&slug, &stage.id)>"Take Quiz →"</a> }.into_any()
                    } else {
                        view! {
                            <Button
                                label="Mark Lesson Complete"
                                busy=marking
                                busy_label="Marking Complete..."
                                on_click=Callback::new(move |()| on_complete.run(complete_id.clone()))
                            />
                        }
                        .into_any()
                    }}
                    {next_href.map(|href| view! { <a class="btn btn--outline" href=href>"Next Stage →"</a> })}
                </div>
            </div>
        </div>
    }
    .into_any()
}
