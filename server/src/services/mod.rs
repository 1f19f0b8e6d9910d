//! Backend-facing services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own calls to the hosted backend so route handlers and
//! middleware stay focused on protocol translation.

pub mod session;
