//! `SQLite` implementation of [`ExecutionRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use autoflow_app::ports::ExecutionRepository;
use autoflow_domain::error::AutoflowError;
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::id::{ExecutionId, RuleId};

use crate::codec::{decode_enum, decode_json, decode_ts, encode_ts, limit, to_i64, to_u64};
use crate::error::StorageError;

struct Wrapper(AutomationExecution);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let rule_id: uuid::Uuid = row.try_get("rule_id")?;
        let trigger_data: Option<String> = row.try_get("trigger_data")?;
        let status: String = row.try_get("status")?;
        let result: Option<String> = row.try_get("result")?;
        let execution_time_ms: i64 = row.try_get("execution_time_ms")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(AutomationExecution {
            id: ExecutionId::from_uuid(id),
            rule_id: RuleId::from_uuid(rule_id),
            rule_name: row.try_get("rule_name")?,
            trigger_data: trigger_data.as_deref().map(decode_json).transpose()?,
            status: decode_enum(&status)?,
            result: result.as_deref().map(decode_json).transpose()?,
            error_message: row.try_get("error_message")?,
            execution_time_ms: to_u64(execution_time_ms)?,
            created_at: decode_ts(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO automation_executions (
        id, rule_id, rule_name, trigger_data, status, result, error_message,
        execution_time_ms, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_RECENT: &str =
    "SELECT * FROM automation_executions ORDER BY created_at DESC, rowid DESC LIMIT ?";
const SELECT_BY_RULE: &str = r"
    SELECT * FROM automation_executions
    WHERE rule_id = ?
    ORDER BY created_at DESC, rowid DESC
    LIMIT ?
";

fn encode_json(value: Option<&serde_json::Value>) -> Result<Option<String>, StorageError> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

/// `SQLite`-backed execution log. Append-only.
#[derive(Clone)]
pub struct SqliteExecutionRepository {
    pool: SqlitePool,
}

impl SqliteExecutionRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ExecutionRepository for SqliteExecutionRepository {
    async fn create(
        &self,
        execution: AutomationExecution,
    ) -> Result<AutomationExecution, AutoflowError> {
        let trigger_data = encode_json(execution.trigger_data.as_ref())?;
        let result = encode_json(execution.result.as_ref())?;

        sqlx::query(INSERT)
            .bind(execution.id.as_uuid())
            .bind(execution.rule_id.as_uuid())
            .bind(&execution.rule_name)
            .bind(&trigger_data)
            .bind(execution.status.as_str())
            .bind(&result)
            .bind(&execution.error_message)
            .bind(to_i64(execution.execution_time_ms))
            .bind(encode_ts(execution.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(execution)
    }

    async fn get_recent(&self, max: usize) -> Result<Vec<AutomationExecution>, AutoflowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(limit(max))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_rule(
        &self,
        rule_id: RuleId,
        max: usize,
    ) -> Result<Vec<AutomationExecution>, AutoflowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_RULE)
            .bind(rule_id.as_uuid())
            .bind(limit(max))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
