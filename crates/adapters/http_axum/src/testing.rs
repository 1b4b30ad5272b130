//! In-memory port doubles and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use autoflow_app::automation_engine::{PassOutcome, PassReport, PassRunner};
use autoflow_app::ports::{ExecutionRepository, RuleRepository};
use autoflow_app::services::execution_service::ExecutionService;
use autoflow_app::services::rule_service::RuleService;
use autoflow_domain::error::{AutoflowError, NotFoundError};
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::id::RuleId;
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::time::Timestamp;

use crate::state::AppState;

#[derive(Default)]
pub struct MemoryRules(Mutex<Vec<AutomationRule>>);

impl RuleRepository for MemoryRules {
    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, AutoflowError> {
        self.0.lock().unwrap().push(rule.clone());
        Ok(rule)
    }

    async fn get_by_id(&self, id: RuleId) -> Result<Option<AutomationRule>, AutoflowError> {
        Ok(self.0.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<AutomationRule>, AutoflowError> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn get_active(&self) -> Result<Vec<AutomationRule>, AutoflowError> {
        let rules = self.0.lock().unwrap();
        Ok(rules.iter().filter(|r| r.is_active).cloned().collect())
    }

    async fn update(&self, rule: AutomationRule) -> Result<AutomationRule, AutoflowError> {
        let mut rules = self.0.lock().unwrap();
        let slot = rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| not_found(rule.id))?;
        *slot = rule.with_history_of(slot);
        Ok(slot.clone())
    }

    async fn record_run(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> Result<AutomationRule, AutoflowError> {
        let mut rules = self.0.lock().unwrap();
        let slot = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        slot.execution_count += 1;
        slot.last_executed = Some(executed_at);
        Ok(slot.clone())
    }

    async fn delete(&self, id: RuleId) -> Result<(), AutoflowError> {
        self.0.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

fn not_found(id: RuleId) -> AutoflowError {
    NotFoundError {
        entity: "AutomationRule",
        id: id.to_string(),
    }
    .into()
}

#[derive(Default)]
pub struct MemoryExecutions(Mutex<Vec<AutomationExecution>>);

impl ExecutionRepository for MemoryExecutions {
    async fn create(
        &self,
        execution: AutomationExecution,
    ) -> Result<AutomationExecution, AutoflowError> {
        self.0.lock().unwrap().push(execution.clone());
        Ok(execution)
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<AutomationExecution>, AutoflowError> {
        let all = self.0.lock().unwrap();
        Ok(all.iter().rev().take(limit).cloned().collect())
    }

    async fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
    ) -> Result<Vec<AutomationExecution>, AutoflowError> {
        let all = self.0.lock().unwrap();
        Ok(all
            .iter()
            .rev()
            .filter(|e| e.rule_id == rule_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Runner that answers with a canned outcome.
pub struct StubRunner {
    pub busy: bool,
}

impl PassRunner for StubRunner {
    async fn run_pass(&self) -> Result<PassOutcome, AutoflowError> {
        if self.busy {
            return Ok(PassOutcome::Skipped);
        }
        Ok(PassOutcome::Completed(PassReport {
            rules_seen: 2,
            completed: 1,
            idle: 1,
            ..PassReport::default()
        }))
    }
}

pub type TestState = AppState<Arc<MemoryRules>, Arc<MemoryExecutions>, StubRunner>;

pub struct Harness {
    pub rules: Arc<MemoryRules>,
    pub executions: Arc<MemoryExecutions>,
    pub state: TestState,
}

impl Harness {
    pub fn new(busy: bool) -> Self {
        let rules = Arc::new(MemoryRules::default());
        let executions = Arc::new(MemoryExecutions::default());
        let state = AppState::new(
            RuleService::new(Arc::clone(&rules)),
            ExecutionService::new(Arc::clone(&executions)),
            Arc::new(StubRunner { busy }),
        );
        Self {
            rules,
            executions,
            state,
        }
    }

    pub fn app(&self) -> Router {
        crate::router::build(self.state.clone())
    }

    pub async fn seed_rule(&self, name: &str) -> AutomationRule {
        let rule = AutomationRule::builder().name(name).build().unwrap();
        self.rules.create(rule).await.unwrap()
    }
}

/// Send one request and decode the JSON body, `Null` when empty.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    respond(app, request).await
}

/// Like [`send`], with a body that need not be valid JSON.
pub async fn send_raw(
    app: Router,
    method: &str,
    uri: &str,
    body: &'static str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    respond(app, request).await
}

async fn respond(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
