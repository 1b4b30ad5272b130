//! `SQLite` implementations of the knowledge base ports.
//!
//! Queries and articles are owned by the knowledge-base feature; the
//! automation loop reads them and writes back one field. The `insert`
//! helpers exist for seeding and tests.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use autoflow_app::ports::{KnowledgeArticleRepository, KnowledgeQueryRepository};
use autoflow_domain::error::{AutoflowError, NotFoundError};
use autoflow_domain::id::{ArticleId, QueryId};
use autoflow_domain::knowledge::{KnowledgeArticle, KnowledgeQuery};
use autoflow_domain::time::CreatedWindow;

use crate::codec::{decode_ts, encode_ts, limit};
use crate::error::StorageError;

struct QueryRow(KnowledgeQuery);

impl<'r> FromRow<'r, SqliteRow> for QueryRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(KnowledgeQuery {
            id: QueryId::from_uuid(id),
            query_text: row.try_get("query_text")?,
            results_found: row.try_get("results_found")?,
            satisfaction: row.try_get("satisfaction")?,
            created_at: decode_ts(&created_at)?,
        }))
    }
}

struct ArticleRow(KnowledgeArticle);

impl<'r> FromRow<'r, SqliteRow> for ArticleRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(KnowledgeArticle {
            id: ArticleId::from_uuid(id),
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            relevance_score: row.try_get("relevance_score")?,
            created_at: decode_ts(&created_at)?,
        }))
    }
}

const INSERT_QUERY: &str = r"
    INSERT INTO knowledge_queries (id, query_text, results_found, satisfaction, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_UNRESOLVED: &str = r"
    SELECT * FROM knowledge_queries
    WHERE results_found = 0
      AND (?1 IS NULL OR created_at > ?1)
      AND created_at <= ?2
    ORDER BY created_at DESC
    LIMIT ?3
";

const UPDATE_SATISFACTION: &str = "UPDATE knowledge_queries SET satisfaction = ? WHERE id = ?";

const INSERT_ARTICLE: &str = r"
    INSERT INTO knowledge_articles (id, title, content, relevance_score, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_TOP_ARTICLES: &str =
    "SELECT * FROM knowledge_articles ORDER BY relevance_score DESC, created_at DESC LIMIT ?";

/// `SQLite`-backed knowledge query store.
#[derive(Clone)]
pub struct SqliteQueryRepository {
    pool: SqlitePool,
}

impl SqliteQueryRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a query.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails.
    pub async fn insert(&self, query: KnowledgeQuery) -> Result<KnowledgeQuery, AutoflowError> {
        sqlx::query(INSERT_QUERY)
            .bind(query.id.as_uuid())
            .bind(&query.query_text)
            .bind(query.results_found)
            .bind(&query.satisfaction)
            .bind(encode_ts(query.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(query)
    }
}

impl KnowledgeQueryRepository for SqliteQueryRepository {
    async fn find_unresolved(
        &self,
        window: CreatedWindow,
        max: usize,
    ) -> Result<Vec<KnowledgeQuery>, AutoflowError> {
        let rows: Vec<QueryRow> = sqlx::query_as(SELECT_UNRESOLVED)
            .bind(window.after.map(encode_ts))
            .bind(encode_ts(window.until))
            .bind(limit(max))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn set_satisfaction(&self, id: QueryId, satisfaction: &str) -> Result<(), AutoflowError> {
        let result = sqlx::query(UPDATE_SATISFACTION)
            .bind(satisfaction)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "KnowledgeQuery",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// `SQLite`-backed knowledge article store.
#[derive(Clone)]
pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store an article.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails.
    pub async fn insert(
        &self,
        article: KnowledgeArticle,
    ) -> Result<KnowledgeArticle, AutoflowError> {
        sqlx::query(INSERT_ARTICLE)
            .bind(article.id.as_uuid())
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.relevance_score)
            .bind(encode_ts(article.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(article)
    }
}

impl KnowledgeArticleRepository for SqliteArticleRepository {
    async fn top_by_relevance(&self, max: usize) -> Result<Vec<KnowledgeArticle>, AutoflowError> {
        let rows: Vec<ArticleRow> = sqlx::query_as(SELECT_TOP_ARTICLES)
            .bind(limit(max))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
