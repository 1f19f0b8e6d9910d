//! Course catalogue with a difficulty filter.

use leptos::prelude::*;

use crate::components::course_card::CourseCard;
use crate::components::page_status::PageLoading;
use crate::net::learning::fetch_courses_with_progress;
use crate::net::types::Course;
use crate::state::auth::AuthSnapshot;
use crate::state::course::{Difficulty, filter_courses};
use crate::util::auth::{install_unauth_redirect, settled_user_id};
use crate::util::loader::{LoadState, Loader};
use crate::util::services::use_services;

#[component]
pub fn CoursesPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let courses = Loader::<Vec<Course>>::new();
    let difficulty = RwSignal::new(Difficulty::All);

    let viewer = Memo::new(move |_| auth.with(settled_user_id));
    Effect::new(move || {
        let Some(user_id) = viewer.get() else {
            return;
        };
        courses.load(services, "Failed to load courses", move |client| async move {
            fetch_courses_with_progress(&client, user_id.as_deref()).await
        });
    });

    let filters = Difficulty::ALL
        .into_iter()
        .map(|level| {
            let class = move || {
                if difficulty.get() == level { "btn btn--primary btn--sm" } else { "btn btn--outline btn--sm" }
            };
            let label = if level == Difficulty::All { "All Courses" } else { level.label() };
            view! {
                <button class=class on:click=move |_| difficulty.set(level)>
                    {label}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="page courses-page">
            <header class="page__header">
                <h1>"All Courses"</h1>
                <p class="page__lead">"Explore all available learning modules"</p>
            </header>
            <div class="filter-bar" role="group" aria-label="Difficulty">{filters}</div>
            {move || match courses.state.get() {
                LoadState::Loading => view! { <PageLoading label="Loading courses..." /> }.into_any(),
                LoadState::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                LoadState::Ready(list) => {
                    let shown = filter_courses(&list, difficulty.get());
                    if shown.is_empty() {
                        view! { <p class="page__empty">"No courses match this filter."</p> }.into_any()
                    } else {
                        view! {
                            <div class="course-grid">
                                {shown
                                    .into_iter()
                                    .map(|course| view! { <CourseCard course=course details=true /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}
