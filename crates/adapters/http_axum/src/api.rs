//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod executions;
#[allow(clippy::missing_errors_doc)]
pub mod passes;
#[allow(clippy::missing_errors_doc)]
pub mod rules;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post, put};

use autoflow_app::automation_engine::PassRunner;
use autoflow_app::ports::{ExecutionRepository, RuleRepository};
use autoflow_domain::error::ValidationError;
use autoflow_domain::id::RuleId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<RR, XR, P>() -> Router<AppState<RR, XR, P>>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    Router::new()
        .route("/rules", get(rules::list).post(rules::create))
        .route(
            "/rules/{id}",
            get(rules::get).put(rules::update).delete(rules::delete),
        )
        .route("/rules/{id}/active", put(rules::set_active))
        .route("/rules/{id}/executions", get(executions::list_for_rule))
        .route("/executions", get(executions::list_recent))
        .route("/passes", post(passes::run))
}

fn parse_rule_id(raw: &str) -> Result<RuleId, ApiError> {
    RuleId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
}
