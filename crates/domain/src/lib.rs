//! # autoflow-domain
//!
//! Pure domain model for the autoflow automation loop.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rules** (trigger type → action type pairings with bookkeeping)
//! - Define **Executions** (one immutable record per rule invocation attempt)
//! - Define the **domain events** a rule can fire on: knowledge queries and
//!   workflow executions, plus the knowledge articles used as context
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod execution;
pub mod knowledge;
pub mod rule;
pub mod workflow;
