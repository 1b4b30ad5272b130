//! # autoflow-adapter-generation-http
//!
//! Generation service adapter for OpenAI-compatible `chat/completions`
//! endpoints, using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `GenerationService` port defined in `autoflow-app::ports`
//! - Ask the model for a JSON object constrained by the request's schema
//! - Check the returned object against that schema before handing it back
//!
//! ## Dependency rule
//! Depends on `autoflow-app` (for the port trait) and `autoflow-domain` (for errors).
//! The `app` and `domain` crates must never reference this adapter.

mod client;
pub mod config;
pub mod error;
pub mod schema;

pub use client::HttpGenerationService;
pub use config::GenerationConfig;
pub use error::GenerationError;
