//! Execution repository port — append-only storage for execution records.

use std::future::Future;
use std::sync::Arc;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::id::RuleId;

/// Repository for persisting and querying [`AutomationExecution`]s.
///
/// Records are immutable once created, so there is no update operation.
pub trait ExecutionRepository {
    /// Persist a new execution record.
    fn create(
        &self,
        execution: AutomationExecution,
    ) -> impl Future<Output = Result<AutomationExecution, AutoflowError>> + Send;

    /// Most recent executions across all rules, newest-first.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send;

    /// Most recent executions of one rule, newest-first.
    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send;
}

impl<T: ExecutionRepository + Send + Sync> ExecutionRepository for Arc<T> {
    fn create(
        &self,
        execution: AutomationExecution,
    ) -> impl Future<Output = Result<AutomationExecution, AutoflowError>> + Send {
        (**self).create(execution)
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send {
        (**self).get_recent(limit)
    }

    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send {
        (**self).find_by_rule(rule_id, limit)
    }
}
