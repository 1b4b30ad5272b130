//! Dispatch — maps a rule's `(trigger_type, action_type)` pair to an invoker.
//!
//! Supported combinations are listed in [`ROUTES`]. Anything not listed is
//! an unsupported rule: the engine skips it without recording anything.

use std::fmt;

use autoflow_domain::rule::{ActionType, TriggerType};

/// The generative procedures the loop knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invoker {
    /// Classify an unresolved knowledge query and write the category back.
    Categorize,
    /// Draft an answer to a knowledge query using top articles.
    DraftResponse,
    /// Validate a running workflow's initial input.
    Validate,
}

impl Invoker {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categorize => "categorize",
            Self::DraftResponse => "draft_response",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every supported `(trigger, action)` pair and the invoker it runs.
pub const ROUTES: &[(TriggerType, ActionType, Invoker)] = &[
    (TriggerType::NewQuery, ActionType::Categorize, Invoker::Categorize),
    (TriggerType::NewQuery, ActionType::DraftResponse, Invoker::DraftResponse),
    (TriggerType::WorkflowStart, ActionType::Validate, Invoker::Validate),
];

/// Look up the invoker for a rule, or `None` when the pair is unsupported.
#[must_use]
pub fn route(trigger: TriggerType, action: ActionType) -> Option<Invoker> {
    ROUTES
        .iter()
        .find(|(t, a, _)| *t == trigger && *a == action)
        .map(|(_, _, invoker)| *invoker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_route_new_query_categorize() {
        assert_eq!(
            route(TriggerType::NewQuery, ActionType::Categorize),
            Some(Invoker::Categorize)
        );
    }

    #[test]
    fn should_route_new_query_draft_response() {
        assert_eq!(
            route(TriggerType::NewQuery, ActionType::DraftResponse),
            Some(Invoker::DraftResponse)
        );
    }

    #[test]
    fn should_route_workflow_start_validate() {
        assert_eq!(
            route(TriggerType::WorkflowStart, ActionType::Validate),
            Some(Invoker::Validate)
        );
    }

    #[test]
    fn should_not_route_unimplemented_actions() {
        for trigger in TriggerType::ALL {
            assert_eq!(route(trigger, ActionType::AssignAgent), None);
            assert_eq!(route(trigger, ActionType::CreateWorkflow), None);
        }
    }

    #[test]
    fn should_not_route_triggers_without_event_source() {
        for trigger in [
            TriggerType::ErrorDetected,
            TriggerType::Schedule,
            TriggerType::CollaborationRequest,
        ] {
            for action in ActionType::ALL {
                assert_eq!(route(trigger, action), None, "{trigger}/{action}");
            }
        }
    }

    #[test]
    fn should_not_route_mismatched_event_and_action() {
        assert_eq!(route(TriggerType::WorkflowStart, ActionType::Categorize), None);
        assert_eq!(route(TriggerType::NewQuery, ActionType::Validate), None);
    }

    #[test]
    fn should_have_exactly_one_route_per_pair() {
        for (i, (t, a, _)) in ROUTES.iter().enumerate() {
            let dupes = ROUTES[i + 1..]
                .iter()
                .filter(|(t2, a2, _)| t2 == t && a2 == a)
                .count();
            assert_eq!(dupes, 0);
        }
    }
}
