//! Per-asset analysis step: fetch, compute, score, write back.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::models::asset::{AnalysisStatus, TrackedAsset};
use crate::models::score::ScoreSource;
use crate::services::market_data::MarketDataFetcher;
use crate::signals::engine::IndicatorEngine;
use crate::signals::scoring::EntryScorer;

/// Drives the fetch -> indicators -> score pipeline for one asset and
/// maintains its status transitions.
///
/// Precedence: a successful technical computation always overwrites the
/// stored score; a failed one never does - it flips the status to `Error`
/// and leaves the last good score visible. The target-ratio path only fills
/// in when no score exists yet.
pub struct AssetAnalyzer {
    fetcher: Arc<MarketDataFetcher>,
    metrics: Option<Arc<Metrics>>,
}

impl AssetAnalyzer {
    pub fn new(fetcher: Arc<MarketDataFetcher>) -> Self {
        Self {
            fetcher,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Analyze one shared asset record. Returns true when a score
    /// (technical or target-ratio) was produced.
    pub async fn analyze(&self, asset: &Arc<RwLock<TrackedAsset>>) -> bool {
        let (id, mut current_price, entry_target, had_score) = {
            let mut record = asset.write().await;
            record.status = AnalysisStatus::Loading;
            (
                record.id.clone(),
                record.current_price,
                record.entry_target,
                record.score.is_some(),
            )
        };

        // A fresh cached tick supersedes the stored price.
        if let Some(price) = self.fetcher.cache().price(&id).await {
            current_price = price;
            let mut record = asset.write().await;
            record.current_price = price;
            record.price_updated_at = Some(Utc::now());
        }

        let history = self.fetcher.fetch_price_history(&id, current_price).await;
        let snapshot = IndicatorEngine::compute(&history);

        let mut record = asset.write().await;
        match snapshot {
            Some(snapshot) => {
                let score = EntryScorer::technical(&snapshot);
                info!(
                    asset = %id,
                    score = score.score,
                    quality = ?snapshot.overall_quality,
                    synthetic = snapshot.synthetic,
                    "technical analysis complete"
                );
                record.snapshot = Some(snapshot);
                record.score = Some(score);
                record.status = AnalysisStatus::Scored(ScoreSource::Technical);
                record.analyzed_at = Some(Utc::now());
                if let Some(metrics) = &self.metrics {
                    metrics.assets_analyzed_total.inc();
                }
                true
            }
            None if had_score => {
                warn!(asset = %id, "analysis produced no usable indicators, keeping last score");
                record.status = AnalysisStatus::Error;
                if let Some(metrics) = &self.metrics {
                    metrics.analysis_failures_total.inc();
                }
                false
            }
            None => match EntryScorer::target_ratio(current_price, entry_target) {
                Some(score) => {
                    info!(asset = %id, score = score.score, "target-ratio score applied");
                    record.score = Some(score);
                    record.status = AnalysisStatus::Scored(ScoreSource::TargetRatio);
                    record.analyzed_at = Some(Utc::now());
                    if let Some(metrics) = &self.metrics {
                        metrics.assets_analyzed_total.inc();
                    }
                    true
                }
                None => {
                    warn!(asset = %id, "no usable indicators and no entry target");
                    record.status = AnalysisStatus::Error;
                    if let Some(metrics) = &self.metrics {
                        metrics.analysis_failures_total.inc();
                    }
                    false
                }
            },
        }
    }
}
