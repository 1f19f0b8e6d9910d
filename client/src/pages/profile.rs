//! Profile page: account details, preferences, avatar and learning stats.
//!
//! DESIGN
//! ======
//! Profile row, stats and avatar are fetched by three independent loaders so
//! one failing does not blank the others. Saves are optimistic through
//! [`ProfileEditor`]: the edit shows immediately and is rolled back if the
//! backend rejects it.
//!
//! The content is keyed on the user id and keeps the last known user while
//! auth re-checks, so an email change does not remount it and re-run the
//! loaders.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;

use crate::components::avatar_upload::{AvatarSize, AvatarUpload};
use crate::components::button::{Button, ButtonVariant};
use crate::components::card::Card;
use crate::components::input::Input;
use crate::components::notification::NoticeSlot;
use crate::components::page_status::PageLoading;
use crate::net::types::{LANGUAGES, Preferences, ThemePreference, User, UserProfile, UserStats};
use crate::state::auth::AuthSnapshot;
use crate::state::profile::{ProfileEditor, SaveOutcome, email_changed};
use crate::util::auth::{install_unauth_redirect, retained_user};
use crate::util::loader::{LoadState, Loader};
use crate::util::services::{Services, use_services};
use crate::util::url_params::{Notice, NoticeKind};
use crate::util::validation::validate_email;

/// Profile shown for an account that has no `profiles` row yet.
pub fn blank_profile(user: &User) -> UserProfile {
    UserProfile {
        id: user.id.clone(),
        full_name: user.user_metadata.full_name.clone().unwrap_or_default(),
        avatar_url: None,
        preferences: Preferences::default(),
    }
}

/// `profile` with the basic-information fields replaced.
pub fn with_basic_info(profile: &UserProfile, full_name: &str) -> UserProfile {
    UserProfile { full_name: full_name.trim().to_owned(), ..profile.clone() }
}

/// "18/36" style counter.
pub fn ratio(done: u32, total: u32) -> String {
    format!("{done}/{total}")
}

/// Average score rounded to a whole percent.
#[allow(clippy::cast_possible_truncation)]
pub fn average_label(stats: &UserStats) -> String {
    format!("{}%", stats.average_score.round().clamp(0.0, 100.0) as u8)
}

fn notice(kind: NoticeKind, title: &str, message: &str) -> Option<Notice> {
    Some(Notice { kind, title: title.to_owned(), message: message.to_owned() })
}

/// Banner shown once a save has settled.
pub fn save_notice(outcome: &SaveOutcome) -> Option<Notice> {
    match outcome {
        SaveOutcome::Saved => notice(NoticeKind::Success, "Profile Updated", "Your changes have been saved."),
        SaveOutcome::EmailPending => notice(
            NoticeKind::Success,
            "Profile Updated",
            "Check your new email address to confirm the change.",
        ),
        SaveOutcome::EmailFailed(message) => notice(
            NoticeKind::Error,
            "Email Not Changed",
            &format!("Your other changes were saved, but the email could not be updated: {message}"),
        ),
        SaveOutcome::Failed(message) => notice(NoticeKind::Error, "Save Failed", message),
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthSnapshot>>();
    let services = use_services();
    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let user = Memo::new(move |previous: Option<&Option<User>>| {
        auth.with(|a| retained_user(previous.cloned().flatten(), a))
    });
    let user_id = Memo::new(move |_| user.with(|u| u.as_ref().map(|u| u.id.clone())));

    view! {
        <div class="page profile-page">
            <header class="page-header">
                <h1>"Profile"</h1>
                <p>"Manage your account settings and preferences"</p>
            </header>
            {move || match user_id.get().and_then(|_| user.get_untracked()) {
                Some(user) => view! { <ProfileContent user=user services=services /> }.into_any(),
                None => view! { <PageLoading label="Loading profile..." /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn ProfileContent(user: User, services: Option<Services>) -> impl IntoView {
    let theme = expect_context::<RwSignal<ThemePreference>>();
    let profile = Loader::<UserProfile>::new();
    let stats = Loader::<UserStats>::new();
    let avatar = Loader::<Option<String>>::new();
    let editor = RwSignal::new(ProfileEditor::default());
    let status = RwSignal::new(None::<Notice>);

    let uid = user.id.clone();
    let blank = blank_profile(&user);
    profile.load(services, "Failed to load profile", move |client| async move {
        let row = crate::net::learning::fetch_profile(&client, &uid).await?;
        Ok(row.unwrap_or(blank))
    });
    let uid = user.id.clone();
    stats.load(services, "Failed to load stats", move |client| async move {
        crate::net::learning::get_user_stats(&client, &uid).await
    });
    let uid = user.id.clone();
    avatar.load(services, "Failed to load avatar", move |client| async move {
        crate::net::learning::get_avatar_url(&client, &uid).await
    });

    Effect::new(move || {
        if let Some(loaded) = profile.state.with(|s| s.ready().cloned()) {
            editor.set(ProfileEditor::new(Some(loaded)));
        }
    });

    let account_email = StoredValue::new(user.email.clone());
    let editing = RwSignal::new(false);
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());

    let begin_edit = move || {
        full_name.set(editor.with_untracked(|e| e.shown().map(|p| p.full_name.clone()).unwrap_or_default()));
        email.set(account_email.get_value().unwrap_or_default());
        editing.set(true);
    };

    // Optimistic write; `new_email` is sent to the auth service only after
    // the row is stored.
    let save = move |draft: UserProfile, new_email: Option<String>| {
        if !editor.try_update(|e| e.begin_save(draft.clone())).unwrap_or(false) {
            return;
        }
        status.set(None);
        #[cfg(feature = "hydrate")]
        {
            let Some(client) = crate::util::services::client_of(services) else {
                editor.update(ProfileEditor::rollback);
                return;
            };
            leptos::task::spawn_local(async move {
                let row = crate::net::learning::save_profile(&client, &draft).await;
                let email = match new_email.filter(|_| row.is_ok()) {
                    Some(address) => {
                        let attrs = crate::net::hosted::UserAttributes { email: Some(address), ..Default::default() };
                        Some(client.update_user(&attrs).await.map(|_| ()))
                    }
                    None => None,
                };
                let Some(outcome) = editor.try_update(|e| crate::state::profile::settle_save(e, row, email)) else {
                    return;
                };
                if let SaveOutcome::Failed(e) | SaveOutcome::EmailFailed(e) = &outcome {
                    log::error!("saving profile failed: {e}");
                }
                status.set(save_notice(&outcome));
                if outcome.changes_user() {
                    crate::util::auth::refresh_auth(services);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (services, new_email);
            editor.update(ProfileEditor::rollback);
        }
    };

    let on_save_basic = Callback::new(move |()| {
        let Some(current) = editor.with_untracked(|e| e.shown().cloned()) else {
            return;
        };
        let entered = email.get_untracked();
        let new_email = if email_changed(account_email.get_value().as_deref(), &entered) {
            if let Err(e) = validate_email(&entered) {
                status.set(notice(NoticeKind::Error, "Invalid Email", &e.to_string()));
                return;
            }
            Some(entered.trim().to_owned())
        } else {
            None
        };
        save(with_basic_info(&current, &full_name.get_untracked()), new_email);
        editing.set(false);
    });

    let save_preferences = move |update: Box<dyn FnOnce(&mut Preferences)>| {
        let Some(mut draft) = editor.with_untracked(|e| e.shown().cloned()) else {
            return;
        };
        update(&mut draft.preferences);
        save(draft, None);
    };

    let on_theme = move |ev| {
        let Some(choice) = ThemePreference::parse(&event_target_value(&ev)) else {
            return;
        };
        theme.set(choice);
        crate::util::theme::store(choice);
        save_preferences(Box::new(move |p| p.theme = choice));
    };
    let on_language = move |ev| {
        let code = event_target_value(&ev);
        save_preferences(Box::new(move |p| p.language = code));
    };
    let on_notifications = move |ev| {
        let enabled = event_target_checked(&ev);
        save_preferences(Box::new(move |p| p.notifications = enabled));
    };

    let shown_name = Signal::derive(move || editor.with(|e| e.shown().map(|p| p.full_name.clone()).unwrap_or_default()));
    let display_name = user.display_name();
    let name_or_fallback = Signal::derive(move || {
        let name = shown_name.get();
        if name.trim().is_empty() { display_name.clone() } else { name }
    });
    let avatar_url = Signal::derive(move || avatar.state.with(|s| s.ready().cloned().flatten()));
    let on_avatar = Callback::new(move |url: Option<String>| {
        avatar.state.set(LoadState::Ready(url.clone()));
        editor.update(|e| e.set_avatar(url));
    });
    let prefs = move || editor.with(|e| e.shown().map(|p| p.preferences.clone()).unwrap_or_default());
    let saving = Signal::derive(move || editor.with(ProfileEditor::is_saving));

    let basic_view = move || {
        if editing.get() {
            view! {
                <div class="profile-form">
                    <Input label="Full Name" name="fullName" value=full_name autocomplete="name" />
                    <Input label="Email" name="email" input_type="email" value=email autocomplete="email" />
                    <div class="form-actions">
                        <Button label="Save Changes" busy=saving busy_label="Saving..." on_click=on_save_basic />
                        <Button
                            label="Cancel"
                            variant=ButtonVariant::Outline
                            on_click=Callback::new(move |()| editing.set(false))
                        />
                    </div>
                </div>
            }
            .into_any()
        } else {
            view! {
                <div class="profile-identity">
                    <h3>{move || name_or_fallback.get()}</h3>
                    <p>{account_email.get_value().unwrap_or_default()}</p>
                </div>
            }
            .into_any()
        }
    };

    let stats_view = move || match stats.state.get() {
        LoadState::Loading => view! { <PageLoading label="Loading stats..." /> }.into_any(),
        LoadState::Failed(message) => view! { <p class="form-error">{message}</p> }.into_any(),
        LoadState::Ready(stats) => view! {
            <div class="stats">
                <div class="stats__headline">
                    <div class="stats__value">{average_label(&stats)}</div>
                    <div class="stats__label">"Average Score"</div>
                </div>
                <div class="stats__pair">
                    <div>
                        <div class="stats__value">{stats.completed_courses}</div>
                        <div class="stats__label">"Courses Completed"</div>
                    </div>
                    <div>
                        <div class="stats__value">{stats.total_courses}</div>
                        <div class="stats__label">"Total Courses"</div>
                    </div>
                </div>
                <dl class="stats__rows">
                    <dt>"Stages Completed:"</dt>
                    <dd>{ratio(stats.completed_stages, stats.total_stages)}</dd>
                    <dt>"Quizzes Completed:"</dt>
                    <dd>{ratio(stats.completed_quizzes, stats.total_quizzes)}</dd>
                </dl>
            </div>
        }
        .into_any(),
    };

    let languages = LANGUAGES
        .iter()
        .map(|(code, label)| {
            let code = *code;
            view! { <option value=code selected=move || prefs().language == code>{*label}</option> }
        })
        .collect_view();

    view! {
        <NoticeSlot notice=status />
        {move || profile.state.with(|s| s.error().map(str::to_owned)).map(|message| {
            view! { <p class="form-error">{message}</p> }
        })}
        <div class="profile-grid">
            <div class="profile-main">
                <Card>
                    <div class="card__header">
                        <h2>"Basic Information"</h2>
                        <Show when=move || !editing.get()>
                            <Button
                                label="Edit"
                                variant=ButtonVariant::Outline
                                disabled=Signal::derive(move || editor.with(|e| e.shown().is_none()))
                                on_click=Callback::new(move |()| begin_edit())
                            />
                        </Show>
                    </div>
                    <AvatarUpload
                        user_id=user.id.clone()
                        url=avatar_url
                        name=name_or_fallback
                        on_change=on_avatar
                        size=AvatarSize::Large
                    />
                    {basic_view}
                </Card>
                <Card title="Preferences">
                    <label class="field">
                        <span class="field__label">"Theme"</span>
                        <select name="theme" on:change=on_theme prop:value=move || prefs().theme.as_str()>
                            <option value="light">"Light"</option>
                            <option value="dark">"Dark"</option>
                            <option value="auto">"Auto"</option>
                        </select>
                    </label>
                    <label class="field">
                        <span class="field__label">"Language"</span>
                        <select name="language" on:change=on_language>
                            {languages}
                        </select>
                    </label>
                    <label class="field field--inline">
                        <input
                            type="checkbox"
                            name="notifications"
                            prop:checked=move || prefs().notifications
                            on:change=on_notifications
                        />
                        <span>"Enable email notifications"</span>
                    </label>
                </Card>
            </div>
            <aside class="profile-side">
                <Card title="Learning Stats">{stats_view}</Card>
                <Card title="Account">
                    <a class="btn btn--outline btn--full" href="/update-password">"Change Password"</a>
                </Card>
            </aside>
        </div>
    }
}
