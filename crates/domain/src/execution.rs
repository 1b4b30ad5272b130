//! Automation execution — one immutable record per rule invocation attempt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{ExecutionId, RuleId};
use crate::rule::AutomationRule;
use crate::time::Timestamp;

/// Outcome of an invocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

impl ExecutionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ValidationError::UnknownVariant {
                kind: "execution_status",
                value: other.to_string(),
            }),
        }
    }
}

/// A persisted record of one attempt to run a rule's action.
///
/// Built only through [`AutomationExecution::completed`] or
/// [`AutomationExecution::failed`], so a completed record always carries a
/// result and a failed one always carries an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationExecution {
    pub id: ExecutionId,
    pub rule_id: RuleId,
    pub rule_name: String,
    /// Snapshot of the event that fired the rule, when one was reached.
    pub trigger_data: Option<serde_json::Value>,
    pub status: ExecutionStatus,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub execution_time_ms: u64,
    pub created_at: Timestamp,
}

impl AutomationExecution {
    /// Record a successful attempt.
    #[must_use]
    pub fn completed(
        rule: &AutomationRule,
        trigger_data: serde_json::Value,
        result: serde_json::Value,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            id: ExecutionId::new(),
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            trigger_data: Some(trigger_data),
            status: ExecutionStatus::Completed,
            result: Some(result),
            error_message: None,
            execution_time_ms,
            created_at: crate::time::now(),
        }
    }

    /// Record a failed attempt.
    ///
    /// An empty message is replaced so that a failed record never has a
    /// blank `error_message`.
    #[must_use]
    pub fn failed(
        rule: &AutomationRule,
        trigger_data: Option<serde_json::Value>,
        error_message: impl Into<String>,
        execution_time_ms: u64,
    ) -> Self {
        let mut error_message = error_message.into();
        if error_message.trim().is_empty() {
            error_message = "unknown error".to_string();
        }
        Self {
            id: ExecutionId::new(),
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            trigger_data,
            status: ExecutionStatus::Failed,
            result: None,
            error_message: Some(error_message),
            execution_time_ms,
            created_at: crate::time::now(),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}
