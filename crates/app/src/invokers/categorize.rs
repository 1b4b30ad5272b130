//! `categorize` — classify an unresolved knowledge query.

use serde::{Deserialize, Serialize};

use autoflow_domain::error::AutoflowError;
use autoflow_domain::knowledge::KnowledgeQuery;
use autoflow_domain::rule::AutomationRule;

use super::{Envelope, generate_as, rule_context};
use crate::ports::{GenerationRequest, GenerationService, KnowledgeQueryRepository};

/// Categories offered to the model.
pub(crate) const CATEGORIES: [&str; 6] = [
    "billing",
    "technical",
    "account",
    "product",
    "feature_request",
    "general",
];

/// Structured answer for a classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeOutput {
    pub category: String,
    pub confidence: f64,
    pub reasoning: String,
}

fn schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "category": { "type": "string", "enum": CATEGORIES },
            "confidence": { "type": "number" },
            "reasoning": { "type": "string" }
        },
        "required": ["category", "confidence", "reasoning"],
        "additionalProperties": false
    })
}

fn prompt(rule: &AutomationRule, query: &KnowledgeQuery) -> String {
    format!(
        "Classify the following customer question into exactly one category \
         ({categories}).\n\nQuestion: {text}\n\nReturn the category, a confidence \
         between 0 and 1 and a one-sentence reasoning.{context}",
        categories = CATEGORIES.join(", "),
        text = query.query_text,
        context = rule_context(rule),
    )
}

/// Classify `query`, store the category in its `satisfaction` field and
/// return the envelope.
pub(super) async fn run<G, QR>(
    generation: &G,
    queries: &QR,
    rule: &AutomationRule,
    query: &KnowledgeQuery,
) -> Result<Envelope, AutoflowError>
where
    G: GenerationService + Sync,
    QR: KnowledgeQueryRepository + Sync,
{
    let request = GenerationRequest {
        schema_name: "categorize",
        prompt: prompt(rule, query),
        schema: schema(),
    };
    let (output, data) = generate_as::<_, CategorizeOutput>(generation, request).await?;

    queries.set_satisfaction(query.id, &output.category).await?;
    tracing::debug!(query_id = %query.id, category = %output.category, "query categorized");

    let mut trigger = query.clone();
    trigger.satisfaction = Some(output.category);
    Ok(Envelope {
        trigger: serde_json::to_value(&trigger).map_err(AutoflowError::InvalidOutput)?,
        data,
    })
}
