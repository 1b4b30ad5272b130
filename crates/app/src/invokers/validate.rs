//! `validate` — check a running workflow's initial input.

use serde::{Deserialize, Serialize};

use autoflow_domain::error::AutoflowError;
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::workflow::WorkflowExecution;

use super::{Envelope, generate_as, rule_context};
use crate::ports::{GenerationRequest, GenerationService};

/// Structured answer for a validation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutput {
    pub is_valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

fn schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "is_valid": { "type": "boolean" },
            "issues": { "type": "array", "items": { "type": "string" } },
            "suggestions": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["is_valid", "issues", "suggestions"],
        "additionalProperties": false
    })
}

fn prompt(rule: &AutomationRule, workflow: &WorkflowExecution) -> String {
    let input = serde_json::to_string_pretty(&workflow.initial_input)
        .unwrap_or_else(|_| workflow.initial_input.to_string());
    format!(
        "Validate the input of the workflow \"{name}\" that just started. \
         Report whether it is valid, list any issues and suggest fixes.\n\n\
         Input:\n{input}{context}",
        name = workflow.workflow_name,
        context = rule_context(rule),
    )
}

/// Request a validation verdict; the workflow run is not modified.
pub(super) async fn run<G>(
    generation: &G,
    rule: &AutomationRule,
    workflow: &WorkflowExecution,
) -> Result<Envelope, AutoflowError>
where
    G: GenerationService + Sync,
{
    let request = GenerationRequest {
        schema_name: "validate",
        prompt: prompt(rule, workflow),
        schema: schema(),
    };
    let (output, data) = generate_as::<_, ValidationOutput>(generation, request).await?;
    if !output.is_valid {
        tracing::info!(
            workflow = %workflow.workflow_name,
            issues = output.issues.len(),
            "workflow input flagged as invalid"
        );
    }

    Ok(Envelope {
        trigger: serde_json::to_value(workflow).map_err(AutoflowError::InvalidOutput)?,
        data,
    })
}
