//! # autoflowd — autoflow daemon
//!
//! Composition root that wires all adapters together, starts the automation
//! loop and serves the HTTP API.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize `tracing` from the configured filter
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations and the generation client
//! - Construct the automation engine and start the scheduler
//! - Build the axum router and serve it
//! - On Ctrl-C: stop accepting requests, then stop the scheduler
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use autoflow_adapter_generation_http::HttpGenerationService;
use autoflow_adapter_http_axum::state::AppState;
use autoflow_adapter_storage_sqlite_sqlx::{
    SqliteArticleRepository, SqliteExecutionRepository, SqliteQueryRepository,
    SqliteRuleRepository, SqliteWorkflowRepository,
};
use autoflow_app::automation_engine::{AutomationEngine, EngineSettings};
use autoflow_app::scheduler::Scheduler;
use autoflow_app::services::execution_service::ExecutionService;
use autoflow_app::services::rule_service::RuleService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = autoflow_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let rule_repo = SqliteRuleRepository::new(pool.clone());
    let execution_repo = SqliteExecutionRepository::new(pool.clone());
    let query_repo = SqliteQueryRepository::new(pool.clone());
    let article_repo = SqliteArticleRepository::new(pool.clone());
    let workflow_repo = SqliteWorkflowRepository::new(pool);

    // Generation
    let generation = HttpGenerationService::new(config.generation.clone())?;

    // Automation loop
    let engine = Arc::new(
        AutomationEngine::new(
            rule_repo.clone(),
            execution_repo.clone(),
            query_repo,
            article_repo,
            workflow_repo,
            generation,
        )
        .with_settings(EngineSettings {
            candidate_limit: config.scheduler.candidate_limit,
            ..EngineSettings::default()
        }),
    );
    let scheduler = Scheduler::start(Arc::clone(&engine), config.pass_interval());

    // HTTP
    let state = AppState::new(
        RuleService::new(rule_repo),
        ExecutionService::new(execution_repo),
        engine,
    );
    let app = autoflow_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "autoflowd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;
    tracing::info!("autoflowd stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => tracing::error!(error = %err, "unable to listen for shutdown signal"),
    }
}
