//! `SQLite` implementation of [`RuleRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use autoflow_app::ports::RuleRepository;
use autoflow_domain::error::{AutoflowError, NotFoundError};
use autoflow_domain::id::RuleId;
use autoflow_domain::rule::{AutomationRule, RuleCondition, RuleConfig};
use autoflow_domain::time::Timestamp;

use crate::codec::{decode_enum, decode_json, decode_ts, encode_ts, to_i64, to_u64};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(AutomationRule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationRule> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let trigger_type: String = row.try_get("trigger_type")?;
        let action_type: String = row.try_get("action_type")?;
        let condition: Option<String> = row.try_get("condition")?;
        let config: String = row.try_get("config")?;
        let execution_count: i64 = row.try_get("execution_count")?;
        let last_executed: Option<String> = row.try_get("last_executed")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(AutomationRule {
            id: RuleId::from_uuid(id),
            name: row.try_get("name")?,
            trigger_type: decode_enum(&trigger_type)?,
            action_type: decode_enum(&action_type)?,
            target_agent: row.try_get("target_agent")?,
            condition: condition
                .as_deref()
                .map(decode_json::<RuleCondition>)
                .transpose()?,
            config: decode_json::<RuleConfig>(&config)?,
            is_active: row.try_get("is_active")?,
            execution_count: to_u64(execution_count)?,
            last_executed: last_executed.as_deref().map(decode_ts).transpose()?,
            created_at: decode_ts(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO automation_rules (
        id, name, trigger_type, action_type, target_agent, condition, config,
        is_active, execution_count, last_executed, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_EDITABLE: &str = r"
    UPDATE automation_rules
    SET name = ?, trigger_type = ?, action_type = ?, target_agent = ?,
        condition = ?, config = ?, is_active = ?
    WHERE id = ?
    RETURNING *
";

const RECORD_RUN: &str = r"
    UPDATE automation_rules
    SET execution_count = execution_count + 1, last_executed = ?
    WHERE id = ?
    RETURNING *
";

const SELECT_BY_ID: &str = "SELECT * FROM automation_rules WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM automation_rules ORDER BY created_at, rowid";
const SELECT_ACTIVE: &str =
    "SELECT * FROM automation_rules WHERE is_active = 1 ORDER BY created_at, rowid";
const DELETE: &str = "DELETE FROM automation_rules WHERE id = ?";

fn not_found(id: RuleId) -> AutoflowError {
    NotFoundError {
        entity: "AutomationRule",
        id: id.to_string(),
    }
    .into()
}

fn encode_condition(condition: Option<&RuleCondition>) -> Result<Option<String>, StorageError> {
    Ok(condition.map(serde_json::to_string).transpose()?)
}

/// `SQLite`-backed rule repository.
#[derive(Clone)]
pub struct SqliteRuleRepository {
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RuleRepository for SqliteRuleRepository {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, AutoflowError> {
        let condition = encode_condition(rule.condition.as_ref())?;
        let config = serde_json::to_string(&rule.config).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(rule.id.as_uuid())
            .bind(&rule.name)
            .bind(rule.trigger_type.as_str())
            .bind(rule.action_type.as_str())
            .bind(&rule.target_agent)
            .bind(&condition)
            .bind(&config)
            .bind(rule.is_active)
            .bind(to_i64(rule.execution_count))
            .bind(rule.last_executed.map(encode_ts))
            .bind(encode_ts(rule.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rule)
    }

    async fn get_by_id(&self, id: RuleId) -> Result<Option<AutomationRule>, AutoflowError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<AutomationRule>, AutoflowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_active(&self) -> Result<Vec<AutomationRule>, AutoflowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ACTIVE)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, rule: AutomationRule) -> Result<AutomationRule, AutoflowError> {
        let condition = encode_condition(rule.condition.as_ref())?;
        let config = serde_json::to_string(&rule.config).map_err(StorageError::from)?;

        let row: Option<Wrapper> = sqlx::query_as(UPDATE_EDITABLE)
            .bind(&rule.name)
            .bind(rule.trigger_type.as_str())
            .bind(rule.action_type.as_str())
            .bind(&rule.target_agent)
            .bind(&condition)
            .bind(&config)
            .bind(rule.is_active)
            .bind(rule.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Wrapper::maybe(row).ok_or_else(|| not_found(rule.id))
    }

    async fn record_run(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> Result<AutomationRule, AutoflowError> {
        let row: Option<Wrapper> = sqlx::query_as(RECORD_RUN)
            .bind(encode_ts(executed_at))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Wrapper::maybe(row).ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: RuleId) -> Result<(), AutoflowError> {
        sqlx::query(DELETE)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
