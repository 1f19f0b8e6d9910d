//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared page chrome and form primitives. `header` and
//! `avatar_upload` read shared state from Leptos context providers; the rest
//! take everything through props.

pub mod avatar_upload;
pub mod button;
pub mod card;
pub mod course_card;
pub mod header;
pub mod input;
pub mod notification;
pub mod page_status;
pub mod progress_bar;
