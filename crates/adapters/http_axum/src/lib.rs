//! # autoflow-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for managing automation rules
//!   (`/api/rules`, `/api/rules/{id}/active`, …)
//! - Expose the execution history (`/api/executions`)
//! - Let an operator trigger a pass on demand (`POST /api/passes`)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `autoflow-app` (for port traits and services) and
//! `autoflow-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
