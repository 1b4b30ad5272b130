//! JSON REST handlers for the execution history.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use autoflow_app::automation_engine::PassRunner;
use autoflow_app::ports::{ExecutionRepository, RuleRepository};
use autoflow_app::services::execution_service::DEFAULT_LIMIT;
use autoflow_domain::execution::AutomationExecution;

use super::parse_rule_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for execution listings.
#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

impl ListParams {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<AutomationExecution>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/executions?limit=N` — most recent executions across rules.
pub async fn list_recent<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let executions = state
        .execution_service
        .list_recent(params.limit())
        .await?;
    Ok(ListResponse::Ok(Json(executions)))
}

/// `GET /api/rules/{id}/executions?limit=N` — history of one rule.
pub async fn list_for_rule<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let executions = state
        .execution_service
        .list_for_rule(rule_id, params.limit())
        .await?;
    Ok(ListResponse::Ok(Json(executions)))
}
