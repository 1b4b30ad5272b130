//! Action invokers — one procedure per supported action.
//!
//! Each invoker builds a prompt from an event (and its rule), asks the
//! generation service for an object matching a declared schema, decodes it
//! into a typed output and returns an [`Envelope`].

mod categorize;
mod draft_response;
mod validate;

pub use categorize::CategorizeOutput;
pub use draft_response::DraftOutput;
pub use validate::ValidationOutput;

use serde::Serialize;
use serde::de::DeserializeOwned;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::event::DomainEvent;
use autoflow_domain::rule::AutomationRule;

use crate::dispatch::Invoker;
use crate::ports::{
    GenerationRequest, GenerationService, KnowledgeArticleRepository, KnowledgeQueryRepository,
};

/// Transient pairing of the triggering event and the generated object.
///
/// Never persisted as such; the recorder unpacks it into an execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub trigger: serde_json::Value,
    pub data: serde_json::Value,
}

/// Tunables for the invokers.
#[derive(Debug, Clone)]
pub struct InvokerSettings {
    /// How many articles `draft_response` loads.
    pub article_limit: usize,
    /// How many of those are embedded into the prompt.
    pub article_excerpts: usize,
    /// Excerpt length in characters.
    pub excerpt_chars: usize,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            article_limit: 10,
            article_excerpts: 3,
            excerpt_chars: 500,
        }
    }
}

/// Runs invokers against the ports they need.
pub struct Invokers<'a, QR, AR, G> {
    queries: &'a QR,
    articles: &'a AR,
    generation: &'a G,
    settings: &'a InvokerSettings,
}

impl<'a, QR, AR, G> Invokers<'a, QR, AR, G>
where
    QR: KnowledgeQueryRepository + Sync,
    AR: KnowledgeArticleRepository + Sync,
    G: GenerationService + Sync,
{
    pub fn new(
        queries: &'a QR,
        articles: &'a AR,
        generation: &'a G,
        settings: &'a InvokerSettings,
    ) -> Self {
        Self {
            queries,
            articles,
            generation,
            settings,
        }
    }

    /// Run `invoker` for one event of `rule`.
    ///
    /// # Errors
    ///
    /// - [`AutoflowError::EventMismatch`] if the event kind does not fit the invoker
    /// - [`AutoflowError::Generation`] if the generation service fails
    /// - [`AutoflowError::InvalidOutput`] if the generated object has the wrong shape
    /// - storage errors from article loading or query write-back
    #[tracing::instrument(
        skip_all,
        fields(rule = %rule.name, invoker = %invoker, event = event.kind())
    )]
    pub async fn invoke(
        &self,
        invoker: Invoker,
        rule: &AutomationRule,
        event: &DomainEvent,
    ) -> Result<Envelope, AutoflowError> {
        match (invoker, event) {
            (Invoker::Categorize, DomainEvent::Query(query)) => {
                categorize::run(self.generation, self.queries, rule, query).await
            }
            (Invoker::DraftResponse, DomainEvent::Query(query)) => {
                draft_response::run(self.generation, self.articles, self.settings, rule, query)
                    .await
            }
            (Invoker::Validate, DomainEvent::Workflow(workflow)) => {
                validate::run(self.generation, rule, workflow).await
            }
            (invoker, event) => Err(AutoflowError::EventMismatch {
                invoker: invoker.as_str(),
                event: event.kind(),
            }),
        }
    }
}

/// Ask the generation service and decode the answer into `T`.
///
/// Returns the typed output together with its normalized JSON form, which
/// is what ends up in the envelope.
async fn generate_as<G, T>(
    generation: &G,
    request: GenerationRequest,
) -> Result<(T, serde_json::Value), AutoflowError>
where
    G: GenerationService + Sync,
    T: DeserializeOwned + Serialize,
{
    let raw = generation.generate(request).await?;
    let output: T = serde_json::from_value(raw).map_err(AutoflowError::InvalidOutput)?;
    let normalized = serde_json::to_value(&output).map_err(AutoflowError::InvalidOutput)?;
    Ok((output, normalized))
}

/// Extra context lines taken from the rule, appended to every prompt.
fn rule_context(rule: &AutomationRule) -> String {
    let mut context = String::new();
    if let Some(agent) = &rule.target_agent {
        context.push_str("\nTarget agent: ");
        context.push_str(agent);
    }
    if let Some(condition) = &rule.condition {
        context.push_str("\nCondition: ");
        context.push_str(&condition.to_string());
    }
    if let Some(instructions) = rule.config.get("instructions").and_then(|v| v.as_str()) {
        context.push_str("\nAdditional instructions: ");
        context.push_str(instructions);
    }
    context
}
