//! Rule repository port — persistence for automation rules.

use std::future::Future;
use std::sync::Arc;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::id::RuleId;
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::time::Timestamp;

/// Repository for persisting and querying [`AutomationRule`]s.
pub trait RuleRepository {
    /// Create a new rule in storage.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send;

    /// Get a rule by its unique identifier.
    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, AutoflowError>> + Send;

    /// Get all rules.
    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send;

    /// Snapshot of every rule with `is_active = true`, in the store's
    /// default order.
    fn get_active(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send;

    /// Replace the editable fields of an existing rule.
    ///
    /// `execution_count` and `last_executed` belong to [`record_run`] and are
    /// kept as stored, so an edit racing with a pass never rolls the counter
    /// back. Returns the rule as stored.
    ///
    /// [`record_run`]: RuleRepository::record_run
    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send;

    /// Partial merge after a successful run: `execution_count + 1` and
    /// `last_executed = executed_at`. No other field is touched.
    ///
    /// Returns the rule as stored after the merge.
    fn record_run(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send;

    /// Delete a rule by its unique identifier.
    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), AutoflowError>> + Send;
}

impl<T: RuleRepository + Send + Sync> RuleRepository for Arc<T> {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        (**self).create(rule)
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, AutoflowError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send {
        (**self).get_all()
    }

    fn get_active(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send {
        (**self).get_active()
    }

    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        (**self).update(rule)
    }

    fn record_run(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        (**self).record_run(id, executed_at)
    }

    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), AutoflowError>> + Send {
        (**self).delete(id)
    }
}
