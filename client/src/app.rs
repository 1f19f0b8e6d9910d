//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` provides two reactive contexts to every page: the
//! `RwSignal<AuthSnapshot>` fed by the auth broadcaster and the
//! `RwSignal<ThemePreference>` the header and profile page edit. In the
//! hydrated app it also builds the backend client and broadcaster and shares
//! them through [`Services`].

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::header::Header;
use crate::net::types::ThemePreference;
use crate::pages::{
    check_email::CheckEmailPage, course::CoursePage, courses::CoursesPage, home::HomePage, login::LoginPage,
    profile::ProfilePage, quiz::QuizPage, register::RegisterPage, reset_password::ResetPasswordPage,
    stage::StagePage, update_password::UpdatePasswordPage,
};
use crate::state::auth::AuthSnapshot;
use crate::util::theme;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthSnapshot::default());
    let theme_pref = RwSignal::new(theme::read_preference());
    provide_context(auth);
    provide_context(theme_pref);

    #[cfg(feature = "hydrate")]
    start_services(auth);

    Effect::new(move || theme::apply(theme_pref.get()));

    view! {
        <Stylesheet id="leptos" href="/pkg/mls.css"/>
        <Title text="MLS Framework"/>

        <Router>
            <Header/>
            <main class="main">
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("courses") view=CoursesPage/>
                    <Route path=(StaticSegment("course"), ParamSegment("slug")) view=CoursePage/>
                    <Route
                        path=(StaticSegment("course"), ParamSegment("slug"), StaticSegment("stage"), ParamSegment("id"))
                        view=StagePage
                    />
                    <Route
                        path=(
                            StaticSegment("course"),
                            ParamSegment("slug"),
                            StaticSegment("stage"),
                            ParamSegment("id"),
                            StaticSegment("quiz"),
                        )
                        view=QuizPage
                    />
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=StaticSegment("check-email") view=CheckEmailPage/>
                    <Route path=StaticSegment("reset-password") view=ResetPasswordPage/>
                    <Route path=StaticSegment("update-password") view=UpdatePasswordPage/>
                    <Route path=StaticSegment("profile") view=ProfilePage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page-status page-status--error">
            <h1>"Page not found"</h1>
            <a class="btn btn--primary" href="/">"Go Home"</a>
        </div>
    }
}

/// Build the backend client and auth broadcaster, feed the auth signal from
/// the broadcaster, and run the initial session check. The broadcaster is
/// shut down when the page unloads or `App` is unmounted.
#[cfg(feature = "hydrate")]
fn start_services(auth: RwSignal<AuthSnapshot>) {
    use std::rc::Rc;

    use futures::future::LocalBoxFuture;

    use crate::config::BackendConfig;
    use crate::net::hosted::HostedClient;
    use crate::state::auth::{AuthBroadcaster, SpawnLocal};
    use crate::util::services::Services;

    let config = match BackendConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            // Without a backend nobody can sign in; settle as signed out.
            log::error!("backend not configured: {e}");
            auth.set(AuthSnapshot { loading: false, ..AuthSnapshot::default() });
            return;
        }
    };

    let client = HostedClient::restore(config);
    let spawn: SpawnLocal = Rc::new(|fut: LocalBoxFuture<'static, ()>| leptos::task::spawn_local(fut));
    let broadcaster = AuthBroadcaster::new(Rc::new(client.clone()), spawn);
    // Lives as long as the tab.
    let _subscription = broadcaster.subscribe(move |state, loading| {
        auth.set(AuthSnapshot { state: state.clone(), loading });
    });
    leptos::task::spawn_local(broadcaster.initialize());
    let services = Services::provide(client, broadcaster);

    // Closing the tab never unmounts `App`.
    let unload = window_event_listener(leptos::ev::beforeunload, move |_| services.shutdown());
    on_cleanup(move || {
        unload.remove();
        services.shutdown();
    });
}
