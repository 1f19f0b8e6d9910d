//! Landing page: welcome hero, the viewer's courses with progress, and the
//! one-off notice carried in by email links (`?emailConfirmed=true`,
//! `?message=...`).

use leptos::prelude::*;

use crate::components::course_card::CourseCard;
use crate::components::notification::NoticeSlot;
use crate::components::page_status::PageLoading;
use crate::net::learning::fetch_courses_with_progress;
use crate::net::types::Course;
use crate::state::auth::AuthSnapshot;
use crate::util::auth::settled_user_id;
use crate::util::loader::{LoadState, Loader};
use crate::util::services::use_services;
use crate::util::url_params::{Notice, current_location, home_notice, strip_query};

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    let notice = RwSignal::new(None::<Notice>);
    let courses = Loader::<Vec<Course>>::new();

    // Reads no signals, so it runs once after hydration.
    Effect::new(move || {
        let (search, _) = current_location();
        if let Some(found) = home_notice(&search) {
            notice.set(Some(found));
            strip_query();
        }
    });

    let viewer = Memo::new(move |_| auth.with(settled_user_id));
    Effect::new(move || {
        let Some(user_id) = viewer.get() else {
            return;
        };
        courses.load(services, "Failed to load courses", move |client| async move {
            fetch_courses_with_progress(&client, user_id.as_deref()).await
        });
    });

    let signed_in = move || auth.with(|a| a.state.is_logged_in);

    view! {
        <div class="page home-page">
            <NoticeSlot notice=notice />
            <section class="hero">
                <h1>"Welcome to MLS Framework"</h1>
                <p>
                    "A powerful learning engine that provides modular learning experiences. "
                    "Work through lessons at your own pace and check what you learned with short quizzes."
                </p>
                <Show
                    when=signed_in
                    fallback=|| view! { <a class="btn btn--primary btn--lg" href="/register">"Get Started"</a> }
                >
                    <a class="btn btn--primary btn--lg" href="/courses">"Browse Courses"</a>
                </Show>
            </section>
            <section class="page__section">
                <h2>"Your Courses"</h2>
                <p class="page__lead">"Track your progress across different learning modules"</p>
                {move || match courses.state.get() {
                    LoadState::Loading => view! { <PageLoading label="Loading courses..." /> }.into_any(),
                    LoadState::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                    LoadState::Ready(list) if list.is_empty() => {
                        view! { <p class="page__empty">"No courses are available yet."</p> }.into_any()
                    }
                    LoadState::Ready(list) => {
                        view! {
                            <div class="course-grid">
                                {list.into_iter().map(|course| view! { <CourseCard course=course /> }).collect_view()}
                            </div>
                        }
                        .into_any()
                    }
                }}
            </section>
        </div>
    }
}
