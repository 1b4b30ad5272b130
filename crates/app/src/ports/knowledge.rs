//! Knowledge base ports — read access to queries and articles.

use std::future::Future;
use std::sync::Arc;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::id::QueryId;
use autoflow_domain::knowledge::{KnowledgeArticle, KnowledgeQuery};
use autoflow_domain::time::CreatedWindow;

/// Access to knowledge queries.
pub trait KnowledgeQueryRepository {
    /// Queries with `results_found = false` created inside `window`,
    /// newest-first, at most `limit`.
    fn find_unresolved(
        &self,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeQuery>, AutoflowError>> + Send;

    /// Write a category label into the query's `satisfaction` field.
    fn set_satisfaction(
        &self,
        id: QueryId,
        satisfaction: &str,
    ) -> impl Future<Output = Result<(), AutoflowError>> + Send;
}

/// Read access to knowledge articles.
pub trait KnowledgeArticleRepository {
    /// Articles ordered by descending `relevance_score`, at most `limit`.
    fn top_by_relevance(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeArticle>, AutoflowError>> + Send;
}

impl<T: KnowledgeQueryRepository + Send + Sync> KnowledgeQueryRepository for Arc<T> {
    fn find_unresolved(
        &self,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeQuery>, AutoflowError>> + Send {
        (**self).find_unresolved(window, limit)
    }

    fn set_satisfaction(
        &self,
        id: QueryId,
        satisfaction: &str,
    ) -> impl Future<Output = Result<(), AutoflowError>> + Send {
        (**self).set_satisfaction(id, satisfaction)
    }
}

impl<T: KnowledgeArticleRepository + Send + Sync> KnowledgeArticleRepository for Arc<T> {
    fn top_by_relevance(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeArticle>, AutoflowError>> + Send {
        (**self).top_by_relevance(limit)
    }
}
