//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic to improve reuse and testability.

pub mod auth;
pub mod avatar;
pub mod clock;
pub mod color;
pub mod loader;
pub mod markdown;
pub mod services;
pub mod theme;
pub mod url_params;
pub mod validation;
