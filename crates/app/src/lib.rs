//! # autoflow-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository` — CRUD for automation rules plus run bookkeeping
//!   - `ExecutionRepository` — append & query execution records
//!   - `KnowledgeQueryRepository` / `KnowledgeArticleRepository` — knowledge base reads
//!   - `WorkflowExecutionRepository` — workflow run reads
//!   - `GenerationService` — prompt + JSON schema in, structured object out
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RuleService` — create, edit, toggle, delete rules
//!   - `ExecutionService` — execution history
//!   - `AutomationEngine` — one pass over all active rules
//!   - `Scheduler` — run passes on a fixed interval until stopped
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `autoflow-domain` only (plus `tokio` for timers and locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation_engine;
pub mod dispatch;
pub mod event_source;
pub mod invokers;
pub mod ports;
pub mod recorder;
pub mod scheduler;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
