//! Execution recorder — turns one invocation attempt into exactly one
//! persisted execution record and keeps rule bookkeeping up to date.

use autoflow_domain::error::AutoflowError;
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::time::Timestamp;

use crate::invokers::Envelope;
use crate::ports::{ExecutionRepository, RuleRepository};

/// What ended up in storage for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// A `completed` record was written.
    Completed,
    /// A `failed` record was written.
    Failed,
    /// Nothing could be written; the cause was logged.
    Lost,
}

/// Writes execution records and bumps rule counters.
pub struct ExecutionRecorder<'a, RR, XR> {
    rules: &'a RR,
    executions: &'a XR,
}

impl<'a, RR, XR> ExecutionRecorder<'a, RR, XR>
where
    RR: RuleRepository + Sync,
    XR: ExecutionRepository + Sync,
{
    pub fn new(rules: &'a RR, executions: &'a XR) -> Self {
        Self { rules, executions }
    }

    /// Record a successful attempt, then bump the rule's counter and move
    /// `last_executed` to `executed_at`.
    ///
    /// If the completed record cannot be written, a failed record is
    /// attempted instead and the counter is left alone. If the counter
    /// update fails after the record was written, the error is only logged:
    /// the attempt already has its one record.
    pub async fn record_success(
        &self,
        rule: &AutomationRule,
        envelope: Envelope,
        execution_time_ms: u64,
        executed_at: Timestamp,
    ) -> Recorded {
        let execution = AutomationExecution::completed(
            rule,
            envelope.trigger,
            envelope.data,
            execution_time_ms,
        );
        let trigger_data = execution.trigger_data.clone();

        if let Err(err) = self.executions.create(execution).await {
            tracing::error!(
                rule = %rule.name,
                error = %err.chain_message(),
                "failed to store completed execution"
            );
            return self
                .record_failure(rule, trigger_data, &err, execution_time_ms)
                .await;
        }

        if let Err(err) = self.rules.record_run(rule.id, executed_at).await {
            tracing::error!(
                rule = %rule.name,
                error = %err.chain_message(),
                "failed to update rule counters"
            );
        }
        Recorded::Completed
    }

    /// Record a failed attempt. Rule counters are not touched.
    pub async fn record_failure(
        &self,
        rule: &AutomationRule,
        trigger_data: Option<serde_json::Value>,
        error: &AutoflowError,
        execution_time_ms: u64,
    ) -> Recorded {
        let execution = AutomationExecution::failed(
            rule,
            trigger_data,
            error.chain_message(),
            execution_time_ms,
        );
        match self.executions.create(execution).await {
            Ok(_) => Recorded::Failed,
            Err(err) => {
                tracing::error!(
                    rule = %rule.name,
                    error = %err.chain_message(),
                    "failed to store failed execution"
                );
                Recorded::Lost
            }
        }
    }
}
