//! Knowledge base records: queries asked by users and the articles that
//! may answer them.

use serde::{Deserialize, Serialize};

use crate::id::{ArticleId, QueryId};
use crate::time::Timestamp;

/// A question asked against the knowledge base.
///
/// Queries with `results_found == false` are the "unresolved" ones the
/// `new_query` trigger fires on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeQuery {
    pub id: QueryId,
    pub query_text: String,
    pub results_found: bool,
    /// Category label written back by the `categorize` action.
    pub satisfaction: Option<String>,
    pub created_at: Timestamp,
}

impl KnowledgeQuery {
    /// A fresh unresolved query created now.
    #[must_use]
    pub fn unresolved(query_text: impl Into<String>) -> Self {
        Self {
            id: QueryId::new(),
            query_text: query_text.into(),
            results_found: false,
            satisfaction: None,
            created_at: crate::time::now(),
        }
    }
}

/// An article in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub relevance_score: f64,
    pub created_at: Timestamp,
}

impl KnowledgeArticle {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>, relevance_score: f64) -> Self {
        Self {
            id: ArticleId::new(),
            title: title.into(),
            content: content.into(),
            relevance_score,
            created_at: crate::time::now(),
        }
    }

    /// The first `max_chars` characters of the content, on a char boundary.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}
