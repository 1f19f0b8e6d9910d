//! # mls-client
//!
//! Leptos frontend for the MLS learning platform: course catalogue, lessons,
//! quizzes and profile, backed by a hosted auth/database/storage service.
//!
//! The same crate is compiled twice: with `ssr` into the server binary, which
//! renders pages, and with `hydrate` into WASM, which owns the session and
//! talks to the backend.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and hydrate the server-rendered
/// page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
