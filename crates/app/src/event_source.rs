//! Event source — fetches the bounded set of candidate events for a trigger.

use autoflow_domain::error::AutoflowError;
use autoflow_domain::event::DomainEvent;
use autoflow_domain::rule::TriggerType;
use autoflow_domain::time::CreatedWindow;
use autoflow_domain::workflow::WorkflowStatus;

use crate::ports::{KnowledgeQueryRepository, WorkflowExecutionRepository};

/// Default cap on candidates per rule per pass.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 5;

/// Reads recent domain events of interest, filtered by type and recency.
pub struct EventSource<'a, QR, WR> {
    queries: &'a QR,
    workflows: &'a WR,
    limit: usize,
}

impl<'a, QR, WR> EventSource<'a, QR, WR>
where
    QR: KnowledgeQueryRepository + Sync,
    WR: WorkflowExecutionRepository + Sync,
{
    pub fn new(queries: &'a QR, workflows: &'a WR, limit: usize) -> Self {
        Self {
            queries,
            workflows,
            limit,
        }
    }

    /// Candidate events for `trigger`, newest-first.
    ///
    /// `window.after` is the rule's `last_executed` watermark: events created
    /// at or before it were already handled by an earlier pass. `window.until`
    /// is the pass timestamp; later events wait for the next pass. Triggers
    /// without an event source yield an empty set.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the underlying repositories.
    pub async fn candidates(
        &self,
        trigger: TriggerType,
        window: CreatedWindow,
    ) -> Result<Vec<DomainEvent>, AutoflowError> {
        match trigger {
            TriggerType::NewQuery => {
                let queries = self.queries.find_unresolved(window, self.limit).await?;
                Ok(queries.into_iter().map(DomainEvent::from).collect())
            }
            TriggerType::WorkflowStart => {
                let runs = self
                    .workflows
                    .find_by_status(WorkflowStatus::Running, window, self.limit)
                    .await?;
                Ok(runs.into_iter().map(DomainEvent::from).collect())
            }
            TriggerType::ErrorDetected
            | TriggerType::Schedule
            | TriggerType::CollaborationRequest => Ok(Vec::new()),
        }
    }
}
