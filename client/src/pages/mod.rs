//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (auth redirects, loaders, form
//! submission) and delegates rendering details to `components`. Pure helpers
//! that decide copy or targets live next to the page and are unit tested.

pub mod check_email;
pub mod course;
pub mod courses;
pub mod home;
pub mod login;
pub mod profile;
pub mod quiz;
pub mod register;
pub mod reset_password;
pub mod stage;
pub mod update_password;
