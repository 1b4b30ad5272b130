//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod execution_repo;
pub mod generation;
pub mod knowledge;
pub mod rule_repo;
pub mod workflow;

pub use execution_repo::ExecutionRepository;
pub use generation::{GenerationRequest, GenerationService};
pub use knowledge::{KnowledgeArticleRepository, KnowledgeQueryRepository};
pub use rule_repo::RuleRepository;
pub use workflow::WorkflowExecutionRepository;
