//! Quiz runner: one question at a time, then a scored review. Submitting
//! records the attempt; a pass also completes the stage.

#[cfg(test)]
#[path = "quiz_test.rs"]
mod quiz_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::page_status::{PageError, PageLoading};
use crate::components::progress_bar::ProgressBar;
use crate::net::error::BackendError;
use crate::net::hosted::HostedClient;
use crate::net::learning::{CourseOutline, fetch_course_outline, fetch_quiz_for_stage};
use crate::net::types::{LearningStage, Quiz};
use crate::state::auth::AuthSnapshot;
use crate::state::course::{course_href, stage_href};
use crate::state::quiz::{QuizResult, QuizSession, continue_target};
use crate::util::auth::{install_unauth_redirect, settled_user_id};
use crate::util::loader::{LoadState, Loader};
use crate::util::services::{Services, use_services};

/// Course outline plus the stage's quiz, if it has one.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizPageData {
    pub outline: CourseOutline,
    pub quiz: Option<Quiz>,
}

async fn load_quiz_page(
    client: &HostedClient,
    slug: &str,
    stage_id: &str,
    user_id: Option<&str>,
) -> Result<Option<QuizPageData>, BackendError> {
    let Some(outline) = fetch_course_outline(client, slug, user_id).await? else {
        return Ok(None);
    };
    let quiz = fetch_quiz_for_stage(client, stage_id).await?;
    Ok(Some(QuizPageData { outline, quiz }))
}

/// Result screen copy: `(emoji, headline, verdict)`.
pub fn result_copy(result: QuizResult, passing_score: u8) -> (&'static str, &'static str, String) {
    if result.passed {
        ("🎉", "Congratulations!", "You passed!".to_owned())
    } else {
        ("😔", "Keep Learning!", format!("You need {passing_score}% to pass"))
    }
}

#[component]
pub fn QuizPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let params = use_params_map();
    let data = Loader::<QuizPageData>::new();

    let key = Memo::new(move |_| {
        let slug = params.with(|p| p.get("slug").unwrap_or_default());
        let stage_id = params.with(|p| p.get("id").unwrap_or_default());
        auth.with(settled_user_id).map(|user_id| (slug, stage_id, user_id))
    });
    Effect::new(move || {
        let Some((slug, stage_id, user_id)) = key.get() else {
            return;
        };
        data.load_required(services, "Failed to load quiz", "Course not found", move |client| async move {
            load_quiz_page(&client, &slug, &stage_id, user_id.as_deref()).await
        });
    });

    move || match data.state.get() {
        LoadState::Loading => view! { <PageLoading label="Loading quiz..." /> }.into_any(),
        LoadState::Failed(message) => {
            view! { <PageError title="Quiz Unavailable" message=message href="/courses" link_label="All Courses" /> }
                .into_any()
        }
        LoadState::Ready(QuizPageData { outline, quiz }) => {
            let stage_id = key.with_untracked(|k| k.as_ref().map(|(_, id, _)| id.clone()).unwrap_or_default());
            let slug = outline.course.slug.clone();
            match quiz.filter(|q| !q.questions.is_empty()) {
                None => view! {
                    <PageError
                        title="Quiz Not Found"
                        message="The quiz for this stage doesn't exist."
                        href=stage_href(&slug, &stage_id)
                        link_label="Back to Lesson"
                    />
                }
                .into_any(),
                Some(quiz) => view! {
                    <QuizRunner
                        quiz=quiz
                        course_name=outline.course.name
                        slug=slug
                        stage_id=stage_id
                        stages=outline.stages
                        services=services
                    />
                }
                .into_any(),
            }
        }
    }
}

#[component]
fn QuizRunner(
    quiz: Quiz,
    course_name: String,
    slug: String,
    stage_id: String,
    stages: Vec<LearningStage>,
    services: Option<Services>,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let title = quiz.title.clone();
    let passing_score = quiz.passing_score;
    let session = RwSignal::new(QuizSession::new(quiz));
    let submitting = RwSignal::new(false);
    let save_error = RwSignal::new(None::<String>);

    let lesson_href = stage_href(&slug, &stage_id);
    let stages = StoredValue::new(stages);
    let ids = StoredValue::new((slug.clone(), stage_id.clone()));

    let on_submit = move |_| {
        let Some(result) = session.try_update(QuizSession::submit).flatten() else {
            return;
        };
        let Some(user_id) = auth.with_untracked(|a| a.user().map(|u| u.id.clone())) else {
            return;
        };
        submitting.set(true);
        save_error.set(None);
        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                submitting.set(false);
                return;
            };
            let quiz_id = session.with_untracked(|s| s.quiz().id.clone());
            let (_, stage_id) = ids.get_value();
            leptos::task::spawn_local(async move {
                let attempt = crate::net::types::QuizAttempt {
                    user_id,
                    quiz_id,
                    score: result.score,
                    passed: result.passed,
                };
                if let Err(e) = crate::net::learning::record_quiz_attempt(&client, &attempt, &stage_id).await {
                    log::error!("recording quiz attempt failed: {e}");
                    save_error.set(Some("Your result could not be saved.".to_owned()));
                }
                submitting.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (result, user_id, services, ids);
            submitting.set(false);
        }
    };

    let question_view = move || {
        session.with(|s| {
            let Some(question) = s.current_question() else {
                return ().into_any();
            };
            let selected = s.selected();
            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    view! {
                        <button
                            class="quiz-option"
                            class:quiz-option--selected=selected == Some(i)
                            on:click=move |_| session.update(|s| s.select(i))
                        >
                            {option.clone()}
                        </button>
                    }
                })
                .collect_view();
            let is_last = s.is_last();
            let can_advance = s.can_advance();
            let can_submit = s.can_submit();
            let is_first = s.index() == 0;
            view! {
                <section class="quiz-question">
                    <h2>{question.prompt.clone()}</h2>
                    <div class="quiz-options">{options}</div>
                    <div class="quiz-nav">
                        <button
                            class="btn btn--outline"
                            disabled=is_first
                            on:click=move |_| session.update(QuizSession::previous)
                        >
                            "← Previous"
                        </button>
                        <div class="quiz-nav__right">
                            <a class="btn btn--outline" href=lesson_href.clone()>"Back to Lesson"</a>
                            {if is_last {
                                view! {
                                    <button
                                        class="btn btn--primary"
                                        disabled=move || !can_submit || submitting.get()
                                        on:click=on_submit
                                    >
                                        {move || if submitting.get() { "Submitting..." } else { "Submit Quiz" }}
                                    </button>
                                }
                                .into_any()
                            } else {
                                view! {
                                    <button
                                        class="btn btn--primary"
                                        disabled=!can_advance
                                        on:click=move |_| session.update(QuizSession::next)
                                    >
                                        "Next Question →"
                                    </button>
                                }
                                .into_any()
                            }}
                        </div>
                    </div>
                </section>
            }
            .into_any()
        })
    };

    let results_view = move |result: QuizResult| {
        let (emoji, headline, verdict) = result_copy(result, passing_score);
        let review = session.with_untracked(QuizSession::review);
        let (slug, stage_id) = ids.get_value();
        let continue_href = stages.with_value(|all| continue_target(result, all, &stage_id).href(&slug));
        let rows = review
            .into_iter()
            .map(|item| {
                let correct = (!item.is_correct).then_some(item.correct_answer);
                view! {
                    <li class="review-item" class:review-item--correct=item.is_correct>
                        <span class="review-item__mark">{if item.is_correct { "✓" } else { "✗" }}</span>
                        <div>
                            <p class="review-item__prompt">{item.prompt}</p>
                            <p>"Your answer: " <strong>{item.your_answer.unwrap_or_default()}</strong></p>
                            {correct.map(|answer| view! { <p>"Correct answer: " <strong>{answer}</strong></p> })}
                            <p class="review-item__explanation">{item.explanation}</p>
                        </div>
                    </li>
                }
            })
            .collect_view();
        view! {
            <section class="quiz-results">
                <div class="quiz-results__summary" class:quiz-results__summary--passed=result.passed>
                    <div class="quiz-results__emoji">{emoji}</div>
                    <h2>{headline}</h2>
                    <p>{format!("You scored {}% on this quiz.", result.score)}</p>
                    <p class="quiz-results__verdict">{verdict}</p>
                </div>
                <Show when=move || save_error.with(Option::is_some)>
                    <p class="form-error">{move || save_error.get().unwrap_or_default()}</p>
                </Show>
                <h3>"Question Review"</h3>
                <ol class="review-list">{rows}</ol>
                <div class="quiz-results__actions">
                    <a class="btn btn--outline" href=stage_href(&slug, &stage_id)>"Review Lesson"</a>
                    {if result.passed {
                        view! { <a class="btn btn--primary" href=continue_href>"Continue to Next Stage →"</a> }.into_any()
                    } else {
                        view! {
                            <button class="btn btn--primary" on:click=move |_| session.update(QuizSession::retake)>
                                "Retake Quiz"
                            </button>
                        }
                        .into_any()
                    }}
                </div>
            </section>
        }
    };

    view! {
        <div class="page quiz-page">
            <nav class="breadcrumbs">
                <a href=course_href(&slug)>{course_name}</a>
                <span>"›"</span>
                <a href=stage_href(&slug, &stage_id)>"Lesson"</a>
                <span>"›"</span>
                <span>"Quiz"</span>
            </nav>
            <header class="quiz-header">
                <h1>{title}</h1>
                <div class="quiz-header__meta">
                    <span>{move || session.with(|s| format!("Question {} of {}", s.index() + 1, s.len()))}</span>
                    <span>{format!("Passing Score: {passing_score}%")}</span>
                </div>
                <ProgressBar value=Signal::derive(move || session.with(QuizSession::progress)) />
            </header>
            {move || match session.with(QuizSession::result) {
                Some(result) if !submitting.get() => results_view(result).into_any(),
                _ => question_view().into_any(),
            }}
        </div>
    }
}
