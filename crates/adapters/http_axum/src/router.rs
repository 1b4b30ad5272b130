//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use autoflow_app::automation_engine::PassRunner;
use autoflow_app::ports::{ExecutionRepository, RuleRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level.
pub fn build<RR, XR, P>(state: AppState<RR, XR, P>) -> Router
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
