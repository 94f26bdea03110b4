//! Entry-quality scoring: technical path and price-target fallback.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::score::{EntryScore, EntrySignalClass, ScoreSource};

pub struct EntryScorer;

impl EntryScorer {
    /// Score from a computed indicator snapshot.
    ///
    /// Uses the fixed quality-to-score mapping (95/80/60/30/10) and the
    /// shared class threshold table.
    pub fn technical(snapshot: &IndicatorSnapshot) -> EntryScore {
        let score = snapshot.overall_quality.score();
        EntryScore {
            score,
            signal: EntrySignalClass::from_score(score),
            source: ScoreSource::Technical,
        }
    }

    /// Piecewise-linear score from the current price against the entry
    /// target, used when no technical data is available.
    ///
    /// ratio <= 0.90 maps into 90-100, 0.90-0.95 into 80-90, 0.95-1.05 into
    /// 60-80, 1.05-1.15 into 20-60, above 1.15 into 0-20; always clamped to
    /// `[0, 100]`. `None` when no usable target is set.
    pub fn target_ratio(current_price: f64, entry_target: Option<f64>) -> Option<EntryScore> {
        let target = entry_target.filter(|&t| t > 0.0)?;
        if current_price <= 0.0 {
            return None;
        }
        let ratio = current_price / target;
        let score = if ratio <= 0.90 {
            90.0 + (0.90 - ratio) * 100.0
        } else if ratio <= 0.95 {
            80.0 + (0.95 - ratio) / 0.05 * 10.0
        } else if ratio <= 1.05 {
            60.0 + (1.05 - ratio) / 0.10 * 20.0
        } else if ratio <= 1.15 {
            20.0 + (1.15 - ratio) / 0.10 * 40.0
        } else {
            20.0 - (ratio - 1.15) * 100.0
        };
        let score = score.clamp(0.0, 100.0);
        Some(EntryScore {
            score,
            signal: EntrySignalClass::from_score(score),
            source: ScoreSource::TargetRatio,
        })
    }
}
