//! Shared application state for axum handlers.

use std::sync::Arc;

use autoflow_app::automation_engine::PassRunner;
use autoflow_app::ports::{ExecutionRepository, RuleRepository};
use autoflow_app::services::execution_service::ExecutionService;
use autoflow_app::services::rule_service::RuleService;

/// Application state shared across all axum handlers.
///
/// Generic over the rule repository, the execution repository and the pass
/// runner to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`.
pub struct AppState<RR, XR, P> {
    /// Rule CRUD service.
    pub rule_service: Arc<RuleService<RR>>,
    /// Execution history service.
    pub execution_service: Arc<ExecutionService<XR>>,
    /// Engine used for on-demand passes. Shared with the scheduler.
    pub runner: Arc<P>,
}

impl<RR, XR, P> Clone for AppState<RR, XR, P> {
    fn clone(&self) -> Self {
        Self {
            rule_service: Arc::clone(&self.rule_service),
            execution_service: Arc::clone(&self.execution_service),
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<RR, XR, P> AppState<RR, XR, P>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        rule_service: RuleService<RR>,
        execution_service: ExecutionService<XR>,
        runner: Arc<P>,
    ) -> Self {
        Self {
            rule_service: Arc::new(rule_service),
            execution_service: Arc::new(execution_service),
            runner,
        }
    }
}
