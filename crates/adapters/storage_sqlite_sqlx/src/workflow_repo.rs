//! `SQLite` implementation of [`WorkflowExecutionRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use autoflow_app::ports::WorkflowExecutionRepository;
use autoflow_domain::error::AutoflowError;
use autoflow_domain::id::WorkflowExecutionId;
use autoflow_domain::time::CreatedWindow;
use autoflow_domain::workflow::{WorkflowExecution, WorkflowStatus};

use crate::codec::{decode_enum, decode_json, decode_ts, encode_ts, limit};
use crate::error::StorageError;

struct Wrapper(WorkflowExecution);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let status: String = row.try_get("status")?;
        let initial_input: String = row.try_get("initial_input")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(WorkflowExecution {
            id: WorkflowExecutionId::from_uuid(id),
            workflow_name: row.try_get("workflow_name")?,
            status: decode_enum(&status)?,
            initial_input: decode_json(&initial_input)?,
            created_at: decode_ts(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO workflow_executions (id, workflow_name, status, initial_input, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_BY_STATUS: &str = r"
    SELECT * FROM workflow_executions
    WHERE status = ?1
      AND (?2 IS NULL OR created_at > ?2)
      AND created_at <= ?3
    ORDER BY created_at DESC
    LIMIT ?4
";

/// `SQLite`-backed workflow run store.
#[derive(Clone)]
pub struct SqliteWorkflowRepository {
    pool: SqlitePool,
}

impl SqliteWorkflowRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a workflow run.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails.
    pub async fn insert(
        &self,
        workflow: WorkflowExecution,
    ) -> Result<WorkflowExecution, AutoflowError> {
        let initial_input =
            serde_json::to_string(&workflow.initial_input).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(workflow.id.as_uuid())
            .bind(&workflow.workflow_name)
            .bind(workflow.status.as_str())
            .bind(&initial_input)
            .bind(encode_ts(workflow.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(workflow)
    }
}

impl WorkflowExecutionRepository for SqliteWorkflowRepository {
    async fn find_by_status(
        &self,
        status: WorkflowStatus,
        window: CreatedWindow,
        max: usize,
    ) -> Result<Vec<WorkflowExecution>, AutoflowError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STATUS)
            .bind(status.as_str())
            .bind(window.after.map(encode_ts))
            .bind(encode_ts(window.until))
            .bind(limit(max))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
