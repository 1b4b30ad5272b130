//! Automation rule — a stored pairing of a trigger type with an action type.
//!
//! Rules are created and edited by people. The automation loop only ever
//! touches two fields, [`AutomationRule::execution_count`] and
//! [`AutomationRule::last_executed`], and only through the rule store's
//! `record_run` after a successful run.

mod action;
mod condition;
mod trigger;

pub use action::ActionType;
pub use condition::RuleCondition;
pub use trigger::TriggerType;

use serde::{Deserialize, Serialize};

use crate::error::{AutoflowError, ValidationError};
use crate::id::RuleId;
use crate::time::Timestamp;

/// Free-form per-rule configuration.
pub type RuleConfig = serde_json::Map<String, serde_json::Value>;

/// A rule that reacts to domain events by asking the generation service
/// for a structured result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub name: String,
    pub trigger_type: TriggerType,
    pub action_type: ActionType,
    pub target_agent: Option<String>,
    pub condition: Option<RuleCondition>,
    #[serde(default)]
    pub config: RuleConfig,
    pub is_active: bool,
    pub execution_count: u64,
    pub last_executed: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::Validation`] when `name` is empty or blank.
    pub fn validate(&self) -> Result<(), AutoflowError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Carry the loop-owned bookkeeping over from `previous`.
    ///
    /// Used when a person edits a rule: the edit replaces everything except
    /// identity, creation time and the execution history, which keeps
    /// `execution_count` monotonic across edits.
    #[must_use]
    pub fn with_history_of(mut self, previous: &Self) -> Self {
        self.id = previous.id;
        self.created_at = previous.created_at;
        self.execution_count = previous.execution_count;
        self.last_executed = previous.last_executed;
        self
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    trigger_type: Option<TriggerType>,
    action_type: Option<ActionType>,
    target_agent: Option<String>,
    condition: Option<RuleCondition>,
    config: RuleConfig,
    is_active: Option<bool>,
    execution_count: u64,
    last_executed: Option<Timestamp>,
    created_at: Option<Timestamp>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn trigger_type(mut self, trigger_type: TriggerType) -> Self {
        self.trigger_type = Some(trigger_type);
        self
    }

    #[must_use]
    pub fn action_type(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    #[must_use]
    pub fn target_agent(mut self, agent: impl Into<String>) -> Self {
        self.target_agent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: RuleCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn config(mut self, config: RuleConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn execution_count(mut self, count: u64) -> Self {
        self.execution_count = count;
        self
    }

    #[must_use]
    pub fn last_executed(mut self, ts: Timestamp) -> Self {
        self.last_executed = Some(ts);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// Defaults: trigger `new_query`, action `categorize`, active.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::Validation`] if the name is missing or empty.
    pub fn build(self) -> Result<AutomationRule, AutoflowError> {
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            trigger_type: self.trigger_type.unwrap_or(TriggerType::NewQuery),
            action_type: self.action_type.unwrap_or(ActionType::Categorize),
            target_agent: self.target_agent,
            condition: self.condition,
            config: self.config,
            is_active: self.is_active.unwrap_or(true),
            execution_count: self.execution_count,
            last_executed: self.last_executed,
            created_at: self.created_at.unwrap_or_else(crate::time::now),
        };
        rule.validate()?;
        Ok(rule)
    }
}
