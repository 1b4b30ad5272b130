//! Workflow executions — runs of a workflow that rules can react to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::WorkflowExecutionId;
use crate::time::Timestamp;

/// Lifecycle status of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError::UnknownVariant {
                kind: "workflow_status",
                value: other.to_string(),
            }),
        }
    }
}

/// One run of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub id: WorkflowExecutionId,
    pub workflow_name: String,
    pub status: WorkflowStatus,
    /// Input the run was started with.
    pub initial_input: serde_json::Value,
    pub created_at: Timestamp,
}

impl WorkflowExecution {
    /// A workflow run that has just started.
    #[must_use]
    pub fn started(workflow_name: impl Into<String>, initial_input: serde_json::Value) -> Self {
        Self {
            id: WorkflowExecutionId::new(),
            workflow_name: workflow_name.into(),
            status: WorkflowStatus::Running,
            initial_input,
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_in_running_status() {
        let run = WorkflowExecution::started("onboarding", serde_json::json!({"email": "a@b.c"}));
        assert_eq!(run.status, WorkflowStatus::Running);
        assert_eq!(run.initial_input["email"], "a@b.c");
    }

    #[test]
    fn should_roundtrip_status_through_str() {
        for status in [
            WorkflowStatus::Running,
            WorkflowStatus::Completed,
            WorkflowStatus::Failed,
            WorkflowStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<WorkflowStatus>().unwrap(), status);
        }
    }
}
