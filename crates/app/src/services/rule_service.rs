//! Rule service — use-cases for managing automation rules.

use autoflow_domain::error::{AutoflowError, NotFoundError};
use autoflow_domain::id::RuleId;
use autoflow_domain::rule::AutomationRule;

use crate::ports::RuleRepository;

/// Application service for rule CRUD operations.
pub struct RuleService<R> {
    repo: R,
}

impl<R: RuleRepository> RuleService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new rule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_name = %rule.name))]
    pub async fn create_rule(&self, rule: AutomationRule) -> Result<AutomationRule, AutoflowError> {
        rule.validate()?;
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_rule(&self, id: RuleId) -> Result<AutomationRule, AutoflowError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "AutomationRule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all rules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self) -> Result<Vec<AutomationRule>, AutoflowError> {
        self.repo.get_all().await
    }

    /// Replace the editable part of rule `id` with `edited`.
    ///
    /// Identity, creation time and execution history come from the stored
    /// rule whatever `edited` carries.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::NotFound`] when the rule does not exist,
    /// [`AutoflowError::Validation`] if invariants fail, or a storage error.
    #[tracing::instrument(skip(self, edited))]
    pub async fn update_rule(
        &self,
        id: RuleId,
        edited: AutomationRule,
    ) -> Result<AutomationRule, AutoflowError> {
        let current = self.get_rule(id).await?;
        let rule = edited.with_history_of(&current);
        rule.validate()?;
        self.repo.update(rule).await
    }

    /// Turn a rule on or off.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::NotFound`] when the rule does not exist, or
    /// a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn set_active(
        &self,
        id: RuleId,
        is_active: bool,
    ) -> Result<AutomationRule, AutoflowError> {
        let mut rule = self.get_rule(id).await?;
        rule.is_active = is_active;
        self.repo.update(rule).await
    }

    /// Delete a rule by id. Its execution records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AutoflowError::NotFound`] when the rule does not exist, or
    /// a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: RuleId) -> Result<(), AutoflowError> {
        self.get_rule(id).await?;
        self.repo.delete(id).await
    }
}
