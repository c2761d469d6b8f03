//! Image dashboard for an object-storage bucket.
//!
//! The gateway half (`services`, `handlers`, `routes`) exposes list, upload
//! and delete over HTTP; the `dashboard` half is the stateful client that
//! drives those routes and keeps paginated view state.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
