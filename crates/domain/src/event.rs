//! Domain event — something that happened and that a rule may react to.
//!
//! Events are read-only from the loop's point of view. They are owned by
//! other parts of the platform; the loop only reads a few of their fields
//! and snapshots them into execution records.

use serde::Serialize;

use crate::knowledge::KnowledgeQuery;
use crate::time::Timestamp;
use crate::workflow::WorkflowExecution;

/// A candidate event handed to an action invoker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    /// An unresolved knowledge query.
    Query(KnowledgeQuery),
    /// A running workflow execution.
    Workflow(WorkflowExecution),
}

impl DomainEvent {
    /// Short name of the event kind, used in logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Query(_) => "knowledge_query",
            Self::Workflow(_) => "workflow_execution",
        }
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        match self {
            Self::Query(q) => q.created_at,
            Self::Workflow(w) => w.created_at,
        }
    }

    /// JSON snapshot stored as an execution's `trigger_data`.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        // Both variants are plain data with string keys; serializing them
        // cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<KnowledgeQuery> for DomainEvent {
    fn from(query: KnowledgeQuery) -> Self {
        Self::Query(query)
    }
}

impl From<WorkflowExecution> for DomainEvent {
    fn from(run: WorkflowExecution) -> Self {
        Self::Workflow(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_snapshot_query_fields_without_wrapper() {
        let query = KnowledgeQuery::unresolved("Where is my invoice?");
        let event = DomainEvent::from(query.clone());
        let snapshot = event.snapshot();
        assert_eq!(snapshot["query_text"], "Where is my invoice?");
        assert_eq!(snapshot["id"], query.id.to_string());
        assert_eq!(event.kind(), "knowledge_query");
    }

    #[test]
    fn should_expose_created_at_of_workflow_run() {
        let run = WorkflowExecution::started("billing", serde_json::json!({}));
        let created = run.created_at;
        let event = DomainEvent::from(run);
        assert_eq!(event.created_at(), created);
        assert_eq!(event.kind(), "workflow_execution");
        assert_eq!(event.snapshot()["status"], "running");
    }
}
