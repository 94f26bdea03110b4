//! Sequential analysis scheduler: ordering, timing, idempotence,
//! cancellation, and completion-callback guarantees.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entrix::{
    AnalysisStatus, AssetAnalyzer, FetcherConfig, RunOutcome, SchedulerConfig, ScoreSource,
    SequentialAnalysisScheduler,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::test_utils::{build_stack, make_asset, MockUpstream, TestStack};

fn scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        inter_item_delay: Duration::from_secs(12),
        run_cooldown: Duration::from_secs(15),
    }
}

struct TestRun {
    stack: TestStack,
    scheduler: Arc<SequentialAnalysisScheduler>,
    outcomes: mpsc::UnboundedReceiver<RunOutcome>,
    callback_count: Arc<AtomicUsize>,
}

fn build_run(upstream: MockUpstream) -> TestRun {
    let stack = build_stack(
        upstream,
        Duration::ZERO,
        FetcherConfig::default(),
        "portfolio",
    );
    let analyzer = Arc::new(AssetAnalyzer::new(stack.fetcher.clone()));
    let (tx, outcomes) = mpsc::unbounded_channel();
    let callback_count = Arc::new(AtomicUsize::new(0));
    let count = callback_count.clone();
    let scheduler = Arc::new(
        SequentialAnalysisScheduler::new(
            analyzer,
            stack.coordinator.clone(),
            scheduler_config(),
            "portfolio",
        )
        .with_completion(move |outcome| {
            count.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(outcome);
        }),
    );
    TestRun {
        stack,
        scheduler,
        outcomes,
        callback_count,
    }
}

#[tokio::test(start_paused = true)]
async fn test_three_assets_processed_in_order_with_delays() {
    let mut run = build_run(MockUpstream::ok());
    let assets = vec![
        make_asset("bitcoin", 43000.0, None),
        make_asset("ethereum", 2250.0, None),
        make_asset("solana", 98.0, None),
    ];

    let started = Instant::now();
    assert!(run.scheduler.start_run(assets.clone()).await);

    let outcome = run.outcomes.recv().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            analyzed: 3,
            failed: 0
        }
    );
    assert_eq!(run.callback_count.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::from_secs(24));

    // Strictly in list order, ~12s apart.
    let times = run.stack.upstream.history_call_times.lock().await.clone();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_secs(12));
    assert_eq!(times[2] - times[1], Duration::from_secs(12));

    for asset in &assets {
        let record = asset.read().await;
        assert_eq!(record.status, AnalysisStatus::Scored(ScoreSource::Technical));
        assert!(record.score.is_some());
        assert!(record.snapshot.is_some());
    }
    assert!(!run.scheduler.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_a_no_op_while_running() {
    let mut run = build_run(MockUpstream::ok());
    let assets = vec![
        make_asset("bitcoin", 43000.0, None),
        make_asset("ethereum", 2250.0, None),
    ];

    assert!(run.scheduler.start_run(assets.clone()).await);
    assert!(!run.scheduler.start_run(assets.clone()).await);
    assert!(!run.scheduler.start_run(vec![make_asset("solana", 98.0, None)]).await);

    let outcome = run.outcomes.recv().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { analyzed: 2, .. }));
    // Exactly one run, exactly one callback.
    assert_eq!(run.callback_count.load(Ordering::SeqCst), 1);
    assert_eq!(run.stack.upstream.history_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_blocks_immediate_restart() {
    let mut run = build_run(MockUpstream::ok());

    assert!(
        run.scheduler
            .start_run(vec![make_asset("bitcoin", 43000.0, None)])
            .await
    );
    run.outcomes.recv().await.unwrap();

    // The run finished, but its start was less than the cooldown ago.
    assert!(
        !run.scheduler
            .start_run(vec![make_asset("bitcoin", 43000.0, None)])
            .await
    );

    tokio::time::advance(Duration::from_secs(15)).await;
    assert!(
        run.scheduler
            .start_run(vec![make_asset("bitcoin", 43000.0, None)])
            .await
    );
    run.outcomes.recv().await.unwrap();
    assert_eq!(run.callback_count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_between_items_and_releases_lock() {
    let mut run = build_run(MockUpstream::ok());
    let assets = vec![
        make_asset("bitcoin", 43000.0, None),
        make_asset("ethereum", 2250.0, None),
        make_asset("solana", 98.0, None),
    ];

    assert!(run.scheduler.start_run(assets.clone()).await);

    // Let the first item complete, then cancel during the inter-item pause.
    tokio::time::advance(Duration::from_secs(1)).await;
    run.scheduler.cancel();

    let outcome = run.outcomes.recv().await.unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled { completed_items: 1 });
    assert_eq!(run.callback_count.load(Ordering::SeqCst), 1);
    assert_eq!(run.stack.upstream.history_calls.load(Ordering::SeqCst), 1);

    // The second asset was never scheduled.
    assert_eq!(assets[1].read().await.status, AnalysisStatus::Pending);

    // The intensive lock was released on the cancellation path.
    assert!(run.stack.coordinator.start_intensive("watchlist").await);
}

#[tokio::test(start_paused = true)]
async fn test_run_denied_while_other_consumer_holds_intensive_lock() {
    let run = build_run(MockUpstream::ok());
    assert!(run.stack.coordinator.start_intensive("watchlist").await);

    assert!(
        !run.scheduler
            .start_run(vec![make_asset("bitcoin", 43000.0, None)])
            .await
    );
    assert_eq!(run.callback_count.load(Ordering::SeqCst), 0);
    assert_eq!(run.stack.upstream.history_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_technical_analysis_keeps_last_score() {
    let run = build_run(MockUpstream::ok());

    // Too-short history: unusable for indicators.
    run.stack
        .upstream
        .script_history(Ok(crate::test_utils::uptrend_points(5, 100.0)))
        .await;

    let asset = make_asset("bitcoin", 95.0, Some(100.0));
    let analyzer = AssetAnalyzer::new(run.stack.fetcher.clone());

    // First pass: no indicators, no previous score, so the target-ratio
    // path fills in (ratio 0.95 lands in the Buy band).
    assert!(analyzer.analyze(&asset).await);
    {
        let record = asset.read().await;
        assert_eq!(record.status, AnalysisStatus::Scored(ScoreSource::TargetRatio));
        let score = record.score.clone().unwrap();
        assert!((80.0..90.0).contains(&score.score));
    }

    // Second pass: the cached short history is still unusable, but now a
    // score exists; it must survive with an explicit error status.
    assert!(!analyzer.analyze(&asset).await);
    {
        let record = asset.read().await;
        assert_eq!(record.status, AnalysisStatus::Error);
        assert!(record.score.is_some());
        assert_eq!(record.score.clone().unwrap().source, ScoreSource::TargetRatio);
    }
}

#[tokio::test(start_paused = true)]
async fn test_technical_score_supersedes_target_ratio() {
    let run = build_run(MockUpstream::ok());
    let asset = make_asset("bitcoin", 95.0, Some(100.0));
    let analyzer = AssetAnalyzer::new(run.stack.fetcher.clone());

    // Target-ratio first (short history), then a real series arrives.
    run.stack
        .upstream
        .script_history(Ok(crate::test_utils::uptrend_points(5, 100.0)))
        .await;
    assert!(analyzer.analyze(&asset).await);
    assert_eq!(
        asset.read().await.score.clone().unwrap().source,
        ScoreSource::TargetRatio
    );

    // Invalidate the cached short series so the next fetch hits upstream.
    run.stack.cache.invalidate("bitcoin").await;
    assert!(analyzer.analyze(&asset).await);
    let record = asset.read().await;
    assert_eq!(record.status, AnalysisStatus::Scored(ScoreSource::Technical));
    assert_eq!(record.score.clone().unwrap().source, ScoreSource::Technical);
}
