//! JSON REST handlers for automation rules.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use autoflow_app::automation_engine::PassRunner;
use autoflow_app::ports::{ExecutionRepository, RuleRepository};
use autoflow_domain::rule::{ActionType, AutomationRule, RuleCondition, RuleConfig, TriggerType};

use super::parse_rule_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a rule.
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub trigger_type: TriggerType,
    pub action_type: ActionType,
    pub target_agent: Option<String>,
    pub condition: Option<RuleCondition>,
    pub config: Option<RuleConfig>,
    pub is_active: Option<bool>,
}

/// Request body for replacing the editable part of a rule.
#[derive(Deserialize)]
pub struct UpdateRuleRequest {
    pub name: String,
    pub trigger_type: TriggerType,
    pub action_type: ActionType,
    pub target_agent: Option<String>,
    pub condition: Option<RuleCondition>,
    #[serde(default)]
    pub config: RuleConfig,
    pub is_active: bool,
}

/// Request body for toggling a rule.
#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AutomationRule>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get, update and toggle endpoints.
pub enum GetResponse {
    Ok(Json<AutomationRule>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<AutomationRule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/rules` — list all rules.
pub async fn list<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
) -> Result<ListResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rules = state.rule_service.list_rules().await?;
    Ok(ListResponse::Ok(Json(rules)))
}

/// `GET /api/rules/{id}` — get a rule by id.
pub async fn get<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let rule = state.rule_service.get_rule(rule_id).await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `POST /api/rules` — create a new rule.
pub async fn create<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    payload: Result<Json<CreateRuleRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let Json(req) = payload?;
    let mut builder = AutomationRule::builder()
        .name(req.name)
        .trigger_type(req.trigger_type)
        .action_type(req.action_type);

    if let Some(agent) = req.target_agent {
        builder = builder.target_agent(agent);
    }
    if let Some(condition) = req.condition {
        builder = builder.condition(condition);
    }
    if let Some(config) = req.config {
        builder = builder.config(config);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.is_active(is_active);
    }

    let rule = builder.build()?;
    let created = state.rule_service.create_rule(rule).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/rules/{id}` — replace the editable part of a rule.
///
/// Execution count and last run time are kept from the stored rule.
pub async fn update<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRuleRequest>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let Json(req) = payload?;

    let mut builder = AutomationRule::builder()
        .id(rule_id)
        .name(req.name)
        .trigger_type(req.trigger_type)
        .action_type(req.action_type)
        .config(req.config)
        .is_active(req.is_active);

    if let Some(agent) = req.target_agent {
        builder = builder.target_agent(agent);
    }
    if let Some(condition) = req.condition {
        builder = builder.condition(condition);
    }

    let edited = builder.build()?;
    let updated = state.rule_service.update_rule(rule_id, edited).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `PUT /api/rules/{id}/active` — switch a rule on or off.
pub async fn set_active<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Path(id): Path<String>,
    payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let Json(req) = payload?;
    let rule = state
        .rule_service
        .set_active(rule_id, req.is_active)
        .await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `DELETE /api/rules/{id}` — delete a rule. Its executions are kept.
pub async fn delete<RR, XR, P>(
    State(state): State<AppState<RR, XR, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    RR: RuleRepository + Send + Sync + 'static,
    XR: ExecutionRepository + Send + Sync + 'static,
    P: PassRunner + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    state.rule_service.delete_rule(rule_id).await?;
    Ok(DeleteResponse::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use autoflow_app::ports::RuleRepository;
    use autoflow_domain::time::now;

    use crate::testing::{Harness, send, send_raw};

    #[tokio::test]
    async fn should_create_rule_with_defaults() {
        let harness = Harness::new(false);

        let (status, body) = send(
            harness.app(),
            "POST",
            "/api/rules",
            Some(json!({
                "name": "Categorize unanswered questions",
                "trigger_type": "new_query",
                "action_type": "categorize"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Categorize unanswered questions");
        assert_eq!(body["is_active"], true);
        assert_eq!(body["execution_count"], 0);
        assert!(body["last_executed"].is_null());
        assert_eq!(harness.rules.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_blank_name() {
        let harness = Harness::new(false);

        let (status, body) = send(
            harness.app(),
            "POST",
            "/api/rules",
            Some(json!({
                "name": "   ",
                "trigger_type": "new_query",
                "action_type": "categorize"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name must not be empty");
    }

    #[tokio::test]
    async fn should_reject_unknown_trigger_type_with_json_error() {
        let harness = Harness::new(false);

        let (status, body) = send(
            harness.app(),
            "POST",
            "/api/rules",
            Some(json!({
                "name": "Weather",
                "trigger_type": "rain_detected",
                "action_type": "categorize"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("rain_detected"));
        let (_, listed) = send(harness.app(), "GET", "/api/rules", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn should_reject_malformed_body_with_json_error() {
        let harness = Harness::new(false);

        let (status, body) = send_raw(harness.app(), "POST", "/api/rules", "{\"name\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn should_list_rules() {
        let harness = Harness::new(false);
        harness.seed_rule("First").await;
        harness.seed_rule("Second").await;

        let (status, body) = send(harness.app(), "GET", "/api/rules", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_return_400_for_malformed_id() {
        let harness = Harness::new(false);

        let (status, body) = send(harness.app(), "GET", "/api/rules/not-a-uuid", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid identifier: not-a-uuid");
    }

    #[tokio::test]
    async fn should_return_404_for_missing_rule() {
        let harness = Harness::new(false);
        let id = autoflow_domain::id::RuleId::new();

        let (status, _) = send(harness.app(), "GET", &format!("/api/rules/{id}"), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_keep_execution_history_when_rule_is_edited() {
        let harness = Harness::new(false);
        let rule = harness.seed_rule("Categorize").await;
        let ran_at = now();
        for _ in 0..3 {
            harness.rules.record_run(rule.id, ran_at).await.unwrap();
        }

        let (status, body) = send(
            harness.app(),
            "PUT",
            &format!("/api/rules/{}", rule.id),
            Some(json!({
                "name": "Draft replies",
                "trigger_type": "new_query",
                "action_type": "draft_response",
                "is_active": true,
                "execution_count": 0
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Draft replies");
        assert_eq!(body["action_type"], "draft_response");
        assert_eq!(body["execution_count"], 3);
        assert!(!body["last_executed"].is_null());
    }

    #[tokio::test]
    async fn should_toggle_rule() {
        let harness = Harness::new(false);
        let rule = harness.seed_rule("Categorize").await;

        let (status, body) = send(
            harness.app(),
            "PUT",
            &format!("/api/rules/{}/active", rule.id),
            Some(json!({"is_active": false})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);
        assert!(harness.rules.get_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_delete_rule() {
        let harness = Harness::new(false);
        let rule = harness.seed_rule("Categorize").await;
        let uri = format!("/api/rules/{}", rule.id);

        let (status, _) = send(harness.app(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(harness.app(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
