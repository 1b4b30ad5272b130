//! Action type — the generative task a rule performs once triggered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The kind of work a rule asks the generation service to do.
///
/// Not every action has an invoker: `assign_agent` and `create_workflow`
/// can be stored and edited but are never executed by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Classify a knowledge query into a category.
    Categorize,
    /// Check a workflow execution's input for problems.
    Validate,
    /// Draft an answer to a knowledge query from the article base.
    DraftResponse,
    /// Hand the event to a specific agent.
    AssignAgent,
    /// Spawn a new workflow from the event.
    CreateWorkflow,
}

impl ActionType {
    /// Every action type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Categorize,
        Self::Validate,
        Self::DraftResponse,
        Self::AssignAgent,
        Self::CreateWorkflow,
    ];

    /// Stable snake-case name, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categorize => "categorize",
            Self::Validate => "validate",
            Self::DraftResponse => "draft_response",
            Self::AssignAgent => "assign_agent",
            Self::CreateWorkflow => "create_workflow",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "action_type",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_variant_from_its_display_form() {
        for action in ActionType::ALL {
            let parsed: ActionType = action.to_string().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn should_deserialize_from_snake_case_json() {
        let action: ActionType = serde_json::from_str("\"draft_response\"").unwrap();
        assert_eq!(action, ActionType::DraftResponse);
    }

    #[test]
    fn should_reject_unknown_action_name() {
        assert!(ActionType::from_str("Categorize").is_err());
    }
}
