//! Client-side state that outlives a single component.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the per-tab auth broadcaster, `observers` is the fan-out list
//! it is built on. `course`, `quiz` and `profile` hold the pure logic behind
//! the course outline, the quiz runner and the profile form.

pub mod auth;
pub mod course;
pub mod observers;
pub mod profile;
pub mod quiz;
