//! `draft_response` — draft an answer to a knowledge query from the
//! most relevant articles.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use autoflow_domain::error::AutoflowError;
use autoflow_domain::knowledge::{KnowledgeArticle, KnowledgeQuery};
use autoflow_domain::rule::AutomationRule;

use super::{Envelope, InvokerSettings, generate_as, rule_context};
use crate::ports::{GenerationRequest, GenerationService, KnowledgeArticleRepository};

/// Structured answer for a drafting request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOutput {
    pub draft_response: String,
    pub confidence: f64,
    #[serde(default)]
    pub related_articles: Vec<String>,
}

fn schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "draft_response": { "type": "string" },
            "confidence": { "type": "number" },
            "related_articles": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["draft_response", "confidence", "related_articles"],
        "additionalProperties": false
    })
}

fn prompt(
    rule: &AutomationRule,
    query: &KnowledgeQuery,
    articles: &[KnowledgeArticle],
    settings: &InvokerSettings,
) -> String {
    let mut knowledge = String::new();
    for article in articles.iter().take(settings.article_excerpts) {
        let _ = write!(
            knowledge,
            "\n### {}\n{}\n",
            article.title,
            article.excerpt(settings.excerpt_chars)
        );
    }
    if knowledge.is_empty() {
        knowledge.push_str("\n(no articles available)\n");
    }

    format!(
        "Draft a helpful reply to the customer question below using only the \
         knowledge base excerpts provided.\n\nQuestion: {text}\n\nKnowledge base:{knowledge}\n\
         List the titles of the articles you relied on.{context}",
        text = query.query_text,
        context = rule_context(rule),
    )
}

/// Load the top articles, embed their excerpts and request a draft.
/// The query itself is left untouched.
pub(super) async fn run<G, AR>(
    generation: &G,
    articles: &AR,
    settings: &InvokerSettings,
    rule: &AutomationRule,
    query: &KnowledgeQuery,
) -> Result<Envelope, AutoflowError>
where
    G: GenerationService + Sync,
    AR: KnowledgeArticleRepository + Sync,
{
    let top = articles.top_by_relevance(settings.article_limit).await?;
    let request = GenerationRequest {
        schema_name: "draft_response",
        prompt: prompt(rule, query, &top, settings),
        schema: schema(),
    };
    let (_, data) = generate_as::<_, DraftOutput>(generation, request).await?;

    Ok(Envelope {
        trigger: serde_json::to_value(query).map_err(AutoflowError::InvalidOutput)?,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryKnowledge, ScriptedGeneration};

    fn answer() -> serde_json::Value {
        serde_json::json!({
            "draft_response": "Invoices are under Billing > History.",
            "confidence": 0.8,
            "related_articles": ["Finding invoices"]
        })
    }

    #[tokio::test]
    async fn should_embed_only_top_three_articles_truncated() {
        let knowledge = InMemoryKnowledge::default();
        for (i, score) in [0.1, 0.9, 0.5, 0.7, 0.3].into_iter().enumerate() {
            knowledge.add_article(KnowledgeArticle::new(
                format!("Article {i}"),
                "x".repeat(800),
                score,
            ));
        }
        let generation = ScriptedGeneration::default().answer("draft_response", answer());
        let settings = InvokerSettings::default();
        let rule = AutomationRule::builder().name("Draft").build().unwrap();
        let query = KnowledgeQuery::unresolved("Where is my invoice?");

        run(&generation, &knowledge, &settings, &rule, &query)
            .await
            .unwrap();

        let prompt = &generation.prompts()[0];
        assert!(prompt.contains("Article 1"));
        assert!(prompt.contains("Article 3"));
        assert!(prompt.contains("Article 2"));
        assert!(!prompt.contains("Article 4"));
        assert!(!prompt.contains("Article 0"));
        assert!(!prompt.contains(&"x".repeat(501)));
        assert!(prompt.contains(&"x".repeat(500)));
    }

    #[tokio::test]
    async fn should_return_envelope_without_mutating_query() {
        let query = KnowledgeQuery::unresolved("Where is my invoice?");
        let knowledge = InMemoryKnowledge::with_queries(vec![query.clone()]);
        let generation = ScriptedGeneration::default().answer("draft_response", answer());
        let settings = InvokerSettings::default();
        let rule = AutomationRule::builder().name("Draft").build().unwrap();

        let envelope = run(&generation, &knowledge, &settings, &rule, &query)
            .await
            .unwrap();

        assert_eq!(envelope.data["related_articles"][0], "Finding invoices");
        assert_eq!(envelope.trigger["id"], query.id.to_string());
        assert!(knowledge.query(query.id).satisfaction.is_none());
    }

    #[tokio::test]
    async fn should_still_draft_when_no_articles_exist() {
        let knowledge = InMemoryKnowledge::default();
        let generation = ScriptedGeneration::default().answer("draft_response", answer());
        let settings = InvokerSettings::default();
        let rule = AutomationRule::builder().name("Draft").build().unwrap();
        let query = KnowledgeQuery::unresolved("Hello?");

        run(&generation, &knowledge, &settings, &rule, &query)
            .await
            .unwrap();
        assert!(generation.prompts()[0].contains("(no articles available)"));
    }
}
