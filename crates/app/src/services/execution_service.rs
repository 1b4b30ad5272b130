//! Execution service — read-only access to the execution history.

use autoflow_domain::error::{AutoflowError, ValidationError};
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::id::RuleId;

use crate::ports::ExecutionRepository;

/// Largest page a caller may ask for.
pub const MAX_LIMIT: usize = 500;

/// Page size used when the caller does not pick one.
pub const DEFAULT_LIMIT: usize = 50;

/// Application service for browsing execution records.
pub struct ExecutionService<R> {
    repo: R,
}

impl<R: ExecutionRepository> ExecutionService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Most recent executions across all rules, newest-first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLimit`] when `limit` is outside
    /// `1..=MAX_LIMIT`, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn list_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<AutomationExecution>, AutoflowError> {
        check_limit(limit)?;
        self.repo.get_recent(limit).await
    }

    /// Most recent executions of one rule, newest-first.
    ///
    /// Works for deleted rules too: records outlive their rule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLimit`] when `limit` is outside
    /// `1..=MAX_LIMIT`, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
    ) -> Result<Vec<AutomationExecution>, AutoflowError> {
        check_limit(limit)?;
        self.repo.find_by_rule(rule_id, limit).await
    }
}

fn check_limit(limit: usize) -> Result<(), ValidationError> {
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ValidationError::InvalidLimit { max: MAX_LIMIT })
    }
}
