//! On-demand automation passes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use autoflow_app::automation_engine::{PassOutcome, PassReport, PassRunner};
use autoflow_app::ports::{ExecutionRepository, RuleRepository};

use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

/// Possible responses from the run endpoint.
pub enum RunResponse {
    Ok(Json<PassReport>),
    /// A scheduled or manual pass is still running.
    Busy,
}

impl IntoResponse for RunResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Busy => ErrorBody::response(StatusCode::CONFLICT, "a pass is already running"),
        }
    }
}

/// `POST /api/passes` — run one pass now and return its report.
pub async fn run<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
) -> Result<RunResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    match state.runner.run_pass().await? {
        PassOutcome::Completed(report) => Ok(RunResponse::Ok(Json(report))),
        PassOutcome::Skipped => {
            tracing::info!("manual pass rejected, another pass is running");
            Ok(RunResponse::Busy)
        }
    }
}
