//! In-memory port doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use autoflow_domain::error::{AutoflowError, NotFoundError};
use autoflow_domain::execution::AutomationExecution;
use autoflow_domain::id::{QueryId, RuleId};
use autoflow_domain::knowledge::{KnowledgeArticle, KnowledgeQuery};
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::time::{CreatedWindow, Timestamp};
use autoflow_domain::workflow::{WorkflowExecution, WorkflowStatus};

use crate::ports::{
    ExecutionRepository, GenerationRequest, GenerationService, KnowledgeArticleRepository,
    KnowledgeQueryRepository, RuleRepository, WorkflowExecutionRepository,
};

// ── Failure used by the doubles ───────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("{0} unavailable")]
pub struct Unavailable(pub &'static str);

fn storage_down(what: &'static str) -> AutoflowError {
    AutoflowError::Storage(Box::new(Unavailable(what)))
}

// ── Rules ─────────────────────────────────────────────────────────

/// Keeps insertion order so "store default order" is deterministic.
#[derive(Default)]
pub struct InMemoryRuleRepo {
    store: Mutex<Vec<AutomationRule>>,
    pub fail_listing: AtomicBool,
    pub fail_record_run: AtomicBool,
}

impl InMemoryRuleRepo {
    pub fn with(rules: Vec<AutomationRule>) -> Self {
        Self {
            store: Mutex::new(rules),
            ..Self::default()
        }
    }

    pub fn get(&self, id: RuleId) -> AutomationRule {
        self.store
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }
}

impl RuleRepository for InMemoryRuleRepo {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        self.store.lock().unwrap().push(rule.clone());
        async { Ok(rule) }
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, AutoflowError>> + Send {
        let r = self
            .store
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned();
        async { Ok(r) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send {
        let r = self.store.lock().unwrap().clone();
        async { Ok(r) }
    }

    fn get_active(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, AutoflowError>> + Send {
        let r = if self.fail_listing.load(Ordering::SeqCst) {
            Err(storage_down("rule store"))
        } else {
            Ok(self
                .store
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.is_active)
                .cloned()
                .collect())
        };
        async { r }
    }

    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        let mut store = self.store.lock().unwrap();
        let r = match store.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => {
                *slot = rule.with_history_of(&*slot);
                Ok(slot.clone())
            }
            None => Err(NotFoundError {
                entity: "AutomationRule",
                id: rule.id.to_string(),
            }
            .into()),
        };
        async { r }
    }

    fn record_run(
        &self,
        id: RuleId,
        executed_at: Timestamp,
    ) -> impl Future<Output = Result<AutomationRule, AutoflowError>> + Send {
        let r = if self.fail_record_run.load(Ordering::SeqCst) {
            Err(storage_down("rule store"))
        } else {
            let mut store = self.store.lock().unwrap();
            match store.iter_mut().find(|r| r.id == id) {
                Some(rule) => {
                    rule.execution_count += 1;
                    rule.last_executed = Some(executed_at);
                    Ok(rule.clone())
                }
                None => Err(NotFoundError {
                    entity: "AutomationRule",
                    id: id.to_string(),
                }
                .into()),
            }
        };
        async { r }
    }

    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), AutoflowError>> + Send {
        self.store.lock().unwrap().retain(|r| r.id != id);
        async { Ok(()) }
    }
}

// ── Executions ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryExecutionRepo {
    store: Mutex<Vec<AutomationExecution>>,
    pub fail_create: AtomicBool,
}

impl InMemoryExecutionRepo {
    pub fn all(&self) -> Vec<AutomationExecution> {
        self.store.lock().unwrap().clone()
    }
}

impl ExecutionRepository for InMemoryExecutionRepo {
    fn create(
        &self,
        execution: AutomationExecution,
    ) -> impl Future<Output = Result<AutomationExecution, AutoflowError>> + Send {
        let r = if self.fail_create.load(Ordering::SeqCst) {
            Err(storage_down("execution store"))
        } else {
            self.store.lock().unwrap().push(execution.clone());
            Ok(execution)
        };
        async { r }
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send {
        let r: Vec<_> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect();
        async { Ok(r) }
    }

    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationExecution>, AutoflowError>> + Send {
        let r: Vec<_> = self
            .store
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.rule_id == rule_id)
            .take(limit)
            .cloned()
            .collect();
        async { Ok(r) }
    }
}

// ── Knowledge base ────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryKnowledge {
    queries: Mutex<Vec<KnowledgeQuery>>,
    articles: Mutex<Vec<KnowledgeArticle>>,
    pub fail_queries: AtomicBool,
}

impl InMemoryKnowledge {
    pub fn with_queries(queries: Vec<KnowledgeQuery>) -> Self {
        Self {
            queries: Mutex::new(queries),
            ..Self::default()
        }
    }

    pub fn add_query(&self, query: KnowledgeQuery) {
        self.queries.lock().unwrap().push(query);
    }

    pub fn add_article(&self, article: KnowledgeArticle) {
        self.articles.lock().unwrap().push(article);
    }

    pub fn query(&self, id: QueryId) -> KnowledgeQuery {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .unwrap()
    }
}

impl KnowledgeQueryRepository for InMemoryKnowledge {
    fn find_unresolved(
        &self,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeQuery>, AutoflowError>> + Send {
        let r = if self.fail_queries.load(Ordering::SeqCst) {
            Err(storage_down("query store"))
        } else {
            let mut found: Vec<_> = self
                .queries
                .lock()
                .unwrap()
                .iter()
                .filter(|q| !q.results_found)
                .filter(|q| window.contains(q.created_at))
                .cloned()
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            found.truncate(limit);
            Ok(found)
        };
        async { r }
    }

    fn set_satisfaction(
        &self,
        id: QueryId,
        satisfaction: &str,
    ) -> impl Future<Output = Result<(), AutoflowError>> + Send {
        let mut queries = self.queries.lock().unwrap();
        let r = match queries.iter_mut().find(|q| q.id == id) {
            Some(query) => {
                query.satisfaction = Some(satisfaction.to_string());
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "KnowledgeQuery",
                id: id.to_string(),
            }
            .into()),
        };
        async { r }
    }
}

impl KnowledgeArticleRepository for InMemoryKnowledge {
    fn top_by_relevance(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<KnowledgeArticle>, AutoflowError>> + Send {
        let mut articles = self.articles.lock().unwrap().clone();
        articles.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        articles.truncate(limit);
        async { Ok(articles) }
    }
}

// ── Workflow runs ─────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryWorkflowRepo {
    runs: Mutex<Vec<WorkflowExecution>>,
}

impl InMemoryWorkflowRepo {
    pub fn with(runs: Vec<WorkflowExecution>) -> Self {
        Self {
            runs: Mutex::new(runs),
        }
    }
}

impl WorkflowExecutionRepository for InMemoryWorkflowRepo {
    fn find_by_status(
        &self,
        status: WorkflowStatus,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<WorkflowExecution>, AutoflowError>> + Send {
        let mut found: Vec<_> = self
            .runs
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.status == status)
            .filter(|w| window.contains(w.created_at))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit);
        async { Ok(found) }
    }
}

// ── Generation ────────────────────────────────────────────────────

/// Answers each schema name with a canned object; unknown names,
/// `fail_all` and prompts containing `fail_on` produce a generation error.
#[derive(Default)]
pub struct ScriptedGeneration {
    answers: HashMap<&'static str, serde_json::Value>,
    pub requests: Mutex<Vec<GenerationRequest>>,
    pub fail_all: AtomicBool,
    pub fail_on: Mutex<Option<&'static str>>,
}

impl ScriptedGeneration {
    #[must_use]
    pub fn answer(mut self, schema_name: &'static str, value: serde_json::Value) -> Self {
        self.answers.insert(schema_name, value);
        self
    }

    pub fn failing() -> Self {
        let generation = Self::default();
        generation.fail_all.store(true, Ordering::SeqCst);
        generation
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

impl GenerationService for ScriptedGeneration {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<serde_json::Value, AutoflowError>> + Send {
        let rejected = self
            .fail_on
            .lock()
            .unwrap()
            .is_some_and(|needle| request.prompt.contains(needle));
        let r = if rejected || self.fail_all.load(Ordering::SeqCst) {
            Err(AutoflowError::Generation(Box::new(Unavailable(
                "generation service",
            ))))
        } else {
            self.answers.get(request.schema_name).cloned().ok_or_else(|| {
                AutoflowError::Generation(Box::new(Unavailable("scripted answer")))
            })
        };
        self.requests.lock().unwrap().push(request);
        async { r }
    }
}
