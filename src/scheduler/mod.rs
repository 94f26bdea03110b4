//! Sequential analysis run driver.
//!
//! One run walks an ordered asset list, one asset at a time, with a fixed
//! inter-item delay between steps so the upstream rate budget is respected.
//! Runs are exclusive process-wide through the coordinator's intensive lock,
//! cancellable between items, and fire their completion callback exactly
//! once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, RwLock};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::coordination::RateCoordinator;
use crate::metrics::Metrics;
use crate::models::asset::TrackedAsset;
use crate::services::analyzer::AssetAnalyzer;

/// How a finished run terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { analyzed: usize, failed: usize },
    Cancelled { completed_items: usize },
}

pub type CompletionCallback = Arc<dyn Fn(RunOutcome) + Send + Sync>;

#[derive(Debug, Default)]
struct RunState {
    running: bool,
    last_run_started_at: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between consecutive assets.
    pub inter_item_delay: Duration,
    /// Minimum spacing between the starts of two runs.
    pub run_cooldown: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        Self {
            inter_item_delay: config.inter_item_delay,
            run_cooldown: config.run_cooldown,
        }
    }
}

/// Drives `AssetAnalyzer` across an ordered asset list on a background task.
pub struct SequentialAnalysisScheduler {
    analyzer: Arc<AssetAnalyzer>,
    coordinator: Arc<RateCoordinator>,
    config: SchedulerConfig,
    consumer_id: String,
    state: Mutex<RunState>,
    cancelled: AtomicBool,
    cancel_notify: Notify,
    on_complete: Option<CompletionCallback>,
    metrics: Option<Arc<Metrics>>,
}

impl SequentialAnalysisScheduler {
    pub fn new(
        analyzer: Arc<AssetAnalyzer>,
        coordinator: Arc<RateCoordinator>,
        config: SchedulerConfig,
        consumer_id: impl Into<String>,
    ) -> Self {
        Self {
            analyzer,
            coordinator,
            config,
            consumer_id: consumer_id.into(),
            state: Mutex::new(RunState::default()),
            cancelled: AtomicBool::new(false),
            cancel_notify: Notify::new(),
            on_complete: None,
            metrics: None,
        }
    }

    /// Register the completion callback, invoked exactly once per run with
    /// the outcome (completed or cancelled).
    pub fn with_completion(mut self, callback: impl Fn(RunOutcome) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(callback));
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start a run over a snapshot of the asset list.
    ///
    /// A no-op returning false when a run is already active, when the
    /// previous run started less than the cooldown window ago, or when
    /// another consumer holds the intensive lock. Returns true once the
    /// background driver task is spawned.
    pub async fn start_run(self: &Arc<Self>, assets: Vec<Arc<RwLock<TrackedAsset>>>) -> bool {
        {
            let mut state = self.state.lock().await;
            if state.running {
                debug!("analysis run already active, ignoring start");
                return false;
            }
            if let Some(started) = state.last_run_started_at {
                let elapsed = Instant::now().duration_since(started);
                if elapsed < self.config.run_cooldown {
                    debug!(
                        elapsed_secs = elapsed.as_secs(),
                        cooldown_secs = self.config.run_cooldown.as_secs(),
                        "analysis run within cooldown window, ignoring start"
                    );
                    return false;
                }
            }
            if !self.coordinator.start_intensive(&self.consumer_id).await {
                warn!("another consumer holds the intensive lock, skipping run");
                return false;
            }
            state.running = true;
            state.last_run_started_at = Some(Instant::now());
        }
        self.cancelled.store(false, Ordering::SeqCst);
        if let Some(metrics) = &self.metrics {
            metrics.analysis_runs_total.inc();
            metrics.analysis_run_active.set(1);
        }

        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            scheduler.drive(assets).await;
        });
        true
    }

    /// Cooperative cancel: the in-flight item finishes, nothing further is
    /// scheduled. A no-op when idle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancel_notify.notify_waiters();
        info!("analysis run cancellation requested");
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Explicit indexed driver loop: bounded stack, observable progress.
    async fn drive(&self, assets: Vec<Arc<RwLock<TrackedAsset>>>) {
        let total = assets.len();
        info!(assets = total, "analysis run started");

        let mut analyzed = 0;
        let mut failed = 0;
        let mut completed_items = 0;
        let mut cancelled = false;

        for (index, asset) in assets.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }
            debug!(index, total, "analyzing asset");
            if self.analyzer.analyze(asset).await {
                analyzed += 1;
            } else {
                failed += 1;
            }
            completed_items += 1;

            if index + 1 < total && !self.pause_between_items().await {
                cancelled = true;
                break;
            }
        }

        let outcome = if cancelled {
            info!(completed_items, total, "analysis run cancelled");
            RunOutcome::Cancelled { completed_items }
        } else {
            info!(analyzed, failed, "analysis run completed");
            RunOutcome::Completed { analyzed, failed }
        };
        self.finish(outcome).await;
    }

    /// Cancellable inter-item wait. Returns false when the run was cancelled
    /// during (or just before) the pause.
    async fn pause_between_items(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        tokio::select! {
            _ = self.cancel_notify.notified() => false,
            _ = sleep(self.config.inter_item_delay) => !self.cancelled.load(Ordering::SeqCst),
        }
    }

    async fn finish(&self, outcome: RunOutcome) {
        {
            let mut state = self.state.lock().await;
            state.running = false;
        }
        self.coordinator.complete_intensive(&self.consumer_id).await;
        if let Some(metrics) = &self.metrics {
            metrics.analysis_run_active.set(0);
        }
        if let Some(callback) = &self.on_complete {
            callback(outcome);
        }
    }
}
