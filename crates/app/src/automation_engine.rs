//! Automation engine — one pass over every active rule.
//!
//! For each rule the engine resolves an invoker from the rule's
//! `(trigger, action)` pair, fetches candidate events, runs the invoker once
//! per event and records every attempt. A pass never aborts because of a
//! single rule; only a failure to list the rules ends it early.
//!
//! Successful runs move the rule's `last_executed` watermark to the pass
//! start, unless an event of the same batch failed: then the watermark
//! stops just before the oldest failed event so the next pass retries it.

use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Mutex;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::rule::AutomationRule;
use autoflow_domain::time::{CreatedWindow, Timestamp, elapsed_ms, just_before, now};

use crate::dispatch::route;
use crate::event_source::{DEFAULT_CANDIDATE_LIMIT, EventSource};
use crate::invokers::{InvokerSettings, Invokers};
use crate::ports::{
    ExecutionRepository, GenerationService, KnowledgeArticleRepository, KnowledgeQueryRepository,
    RuleRepository, WorkflowExecutionRepository,
};
use crate::recorder::{ExecutionRecorder, Recorded};

/// Tunables for a pass.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Cap on candidate events per rule per pass.
    pub candidate_limit: usize,
    pub invokers: InvokerSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            invokers: InvokerSettings::default(),
        }
    }
}

/// Tally of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Active rules listed at the start of the pass.
    pub rules_seen: usize,
    /// Completed execution records written.
    pub completed: usize,
    /// Failed execution records written.
    pub failed: usize,
    /// Attempts whose record could not be written at all.
    pub lost: usize,
    /// Rules whose `(trigger, action)` pair has no invoker.
    pub unsupported: usize,
    /// Supported rules that found no new events.
    pub idle: usize,
}

impl PassReport {
    fn tally(&mut self, recorded: Recorded) {
        match recorded {
            Recorded::Completed => self.completed += 1,
            Recorded::Failed => self.failed += 1,
            Recorded::Lost => self.lost += 1,
        }
    }
}

/// Result of asking for a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Completed(PassReport),
    /// Another pass was still running; nothing was done.
    Skipped,
}

/// Something that can run an automation pass on demand.
///
/// Implemented by [`AutomationEngine`]; the scheduler and the HTTP adapter
/// only depend on this trait.
pub trait PassRunner: Send + Sync {
    /// Run one pass, or report [`PassOutcome::Skipped`] if one is in flight.
    fn run_pass(&self) -> impl Future<Output = Result<PassOutcome, AutoflowError>> + Send;
}

/// Runs automation passes against the injected ports.
pub struct AutomationEngine<RR, XR, QR, AR, WR, G> {
    rules: RR,
    executions: XR,
    queries: QR,
    articles: AR,
    workflows: WR,
    generation: G,
    settings: EngineSettings,
    pass_lock: Mutex<()>,
}

impl<RR, XR, QR, AR, WR, G> AutomationEngine<RR, XR, QR, AR, WR, G>
where
    RR: RuleRepository + Send + Sync,
    XR: ExecutionRepository + Send + Sync,
    QR: KnowledgeQueryRepository + Send + Sync,
    AR: KnowledgeArticleRepository + Send + Sync,
    WR: WorkflowExecutionRepository + Send + Sync,
    G: GenerationService + Send + Sync,
{
    /// Create an engine with default settings.
    pub fn new(
        rules: RR,
        executions: XR,
        queries: QR,
        articles: AR,
        workflows: WR,
        generation: G,
    ) -> Self {
        Self {
            rules,
            executions,
            queries,
            articles,
            workflows,
            generation,
            settings: EngineSettings::default(),
            pass_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run one pass over all active rules, in store order.
    ///
    /// Returns [`PassOutcome::Skipped`] without doing anything when another
    /// pass is still running.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the active rules cannot be listed. Every
    /// other failure is recorded against its rule and the pass goes on.
    pub async fn run_pass(&self) -> Result<PassOutcome, AutoflowError> {
        let Ok(_guard) = self.pass_lock.try_lock() else {
            tracing::debug!("previous pass still running, skipping");
            return Ok(PassOutcome::Skipped);
        };

        let started_at = now();
        let rules = self.rules.get_active().await?;
        let mut report = PassReport {
            rules_seen: rules.len(),
            ..PassReport::default()
        };

        for rule in &rules {
            self.run_rule(rule, started_at, &mut report).await;
        }

        tracing::info!(
            rules = report.rules_seen,
            completed = report.completed,
            failed = report.failed,
            lost = report.lost,
            "automation pass finished"
        );
        Ok(PassOutcome::Completed(report))
    }

    async fn run_rule(
        &self,
        rule: &AutomationRule,
        started_at: Timestamp,
        report: &mut PassReport,
    ) {
        let Some(invoker) = route(rule.trigger_type, rule.action_type) else {
            tracing::debug!(
                rule = %rule.name,
                trigger = %rule.trigger_type,
                action = %rule.action_type,
                "no invoker for rule, skipping"
            );
            report.unsupported += 1;
            return;
        };

        let recorder = ExecutionRecorder::new(&self.rules, &self.executions);
        let source = EventSource::new(
            &self.queries,
            &self.workflows,
            self.settings.candidate_limit,
        );
        let window = CreatedWindow {
            after: rule.last_executed,
            until: started_at,
        };

        let fetch_start = Instant::now();
        let events = match source.candidates(rule.trigger_type, window).await {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(
                    rule = %rule.name,
                    error = %err.chain_message(),
                    "failed to fetch events"
                );
                let recorded = recorder
                    .record_failure(rule, None, &err, elapsed_ms(fetch_start))
                    .await;
                report.tally(recorded);
                return;
            }
        };

        if events.is_empty() {
            report.idle += 1;
            return;
        }

        let invokers = Invokers::new(
            &self.queries,
            &self.articles,
            &self.generation,
            &self.settings.invokers,
        );
        let mut attempts = Vec::with_capacity(events.len());
        for event in &events {
            let attempt_start = Instant::now();
            let outcome = invokers.invoke(invoker, rule, event).await;
            attempts.push((event, outcome, elapsed_ms(attempt_start)));
        }

        // A failed event must stay inside the next pass's window.
        let watermark = attempts
            .iter()
            .filter(|(_, outcome, _)| outcome.is_err())
            .map(|(event, _, _)| event.created_at())
            .min()
            .map_or(started_at, just_before);

        for (event, outcome, elapsed) in attempts {
            let recorded = match outcome {
                Ok(envelope) => {
                    recorder
                        .record_success(rule, envelope, elapsed, watermark)
                        .await
                }
                Err(err) => {
                    tracing::warn!(
                        rule = %rule.name,
                        error = %err.chain_message(),
                        "automation failed"
                    );
                    recorder
                        .record_failure(rule, Some(event.snapshot()), &err, elapsed)
                        .await
                }
            };
            report.tally(recorded);
        }
    }
}

impl<RR, XR, QR, AR, WR, G> PassRunner for AutomationEngine<RR, XR, QR, AR, WR, G>
where
    RR: RuleRepository + Send + Sync,
    XR: ExecutionRepository + Send + Sync,
    QR: KnowledgeQueryRepository + Send + Sync,
    AR: KnowledgeArticleRepository + Send + Sync,
    WR: WorkflowExecutionRepository + Send + Sync,
    G: GenerationService + Send + Sync,
{
    fn run_pass(&self) -> impl Future<Output = Result<PassOutcome, AutoflowError>> + Send {
        AutomationEngine::run_pass(self)
    }
}
