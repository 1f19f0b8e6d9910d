//! Networking against the hosted backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `hosted` is the HTTP client for the auth, table and storage APIs, `query`
//! builds table filters for it, and `learning` layers the app's data access
//! on top. `backend` is the auth seam the broadcaster depends on; `types`
//! defines the shared wire schema.

pub mod backend;
pub mod error;
pub mod hosted;
pub mod learning;
pub mod query;
pub mod types;
