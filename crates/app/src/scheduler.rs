//! Scheduler — runs an automation pass on a fixed interval until stopped.
//!
//! The first pass fires one full interval after [`Scheduler::start`]. Each
//! pass runs to completion before the next tick is awaited; ticks missed
//! while a pass was running are skipped rather than replayed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::automation_engine::{PassOutcome, PassRunner};

/// Interval between passes when nothing else is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

/// Starts the background pass loop.
pub struct Scheduler;

impl Scheduler {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn start<P>(runner: Arc<P>, period: Duration) -> SchedulerHandle
    where
        P: PassRunner + 'static,
    {
        assert!(!period.is_zero(), "scheduler period must be non-zero");
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(run_loop(runner, period, receiver));
        tracing::info!(period_secs = period.as_secs_f64(), "scheduler started");
        SchedulerHandle { shutdown, task }
    }
}

/// Owner of a running loop. Dropping it stops the loop at its next await.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to exit.
    ///
    /// A pass that is already running finishes first. No pass starts after
    /// this returns.
    pub async fn stop(self) {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "scheduler task ended abnormally");
        }
    }
}

async fn run_loop<P: PassRunner>(
    runner: Arc<P>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        match runner.run_pass().await {
            Ok(PassOutcome::Completed(report)) => {
                tracing::debug!(?report, "scheduled pass done");
            }
            Ok(PassOutcome::Skipped) => {
                tracing::debug!("scheduled pass skipped, another pass in progress");
            }
            Err(err) => {
                tracing::error!(error = %err.chain_message(), "automation pass aborted");
            }
        }
    }

    tracing::info!("scheduler stopped");
}
