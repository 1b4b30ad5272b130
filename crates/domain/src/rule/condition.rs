//! Condition — the free-form guard descriptor attached to a rule.

use serde::{Deserialize, Serialize};

/// A `(type, value)` pair describing an extra matching condition.
///
/// The loop does not evaluate conditions itself; they are carried into the
/// generation prompt as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl std::fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.kind, self.value)
    }
}
