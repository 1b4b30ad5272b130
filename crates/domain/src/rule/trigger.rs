//! Trigger type — the category of domain event a rule watches for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What kind of domain event activates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A knowledge query arrived that found no results.
    NewQuery,
    /// A workflow execution started running.
    WorkflowStart,
    /// An error was detected somewhere in the platform.
    ErrorDetected,
    /// Time-based activation.
    Schedule,
    /// An agent asked for collaboration.
    CollaborationRequest,
}

impl TriggerType {
    /// Every trigger type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::NewQuery,
        Self::WorkflowStart,
        Self::ErrorDetected,
        Self::Schedule,
        Self::CollaborationRequest,
    ];

    /// Stable snake-case name, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewQuery => "new_query",
            Self::WorkflowStart => "workflow_start",
            Self::ErrorDetected => "error_detected",
            Self::Schedule => "schedule",
            Self::CollaborationRequest => "collaboration_request",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "trigger_type",
                value: s.to_string(),
            })
    }
}
