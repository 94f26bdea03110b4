//! Indicator snapshot assembly from a price series.

use chrono::Utc;
use tracing::debug;

use crate::common::math;
use crate::indicators::momentum::macd_with_signal;
use crate::indicators::momentum::wilder_rsi;
use crate::indicators::structure::{retracement_levels, support_resistance};
use crate::indicators::volume::volume_ratio;
use crate::models::indicators::{IndicatorSnapshot, Trend};
use crate::models::price::PriceHistory;
use crate::signals::entry_rules::{self, RuleContext};

/// Minimum series length for a usable snapshot. The synthetic fallback
/// series (30 daily bars) must stay analyzable.
pub const MIN_POINTS: usize = 30;

/// Window for support/resistance, Fibonacci, and volume averaging.
const LOOKBACK: usize = 20;

/// Confidence multiplier applied to every signal computed from synthetic data.
const SYNTHETIC_CONFIDENCE_SCALE: f64 = 0.5;

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute the full indicator snapshot for a price series.
    ///
    /// Pure: no I/O, no shared state. Returns `None` when the series is too
    /// short or degenerate (all-zero closes); callers surface that as the
    /// per-asset error state.
    pub fn compute(history: &PriceHistory) -> Option<IndicatorSnapshot> {
        let points = &history.points;
        if points.len() < MIN_POINTS {
            debug!(len = points.len(), min = MIN_POINTS, "history too short for analysis");
            return None;
        }
        let closes = history.closes();
        if closes.iter().all(|&c| c == 0.0) {
            debug!("degenerate all-zero history");
            return None;
        }

        let price = *closes.last()?;
        let rsi = wilder_rsi(&closes, 14)?;
        let macd = macd_with_signal(&closes, 12, 26, 9)?;

        let sma10 = math::sma(&closes, 10)?;
        // Long windows degrade to the mean of all closes on short series.
        let sma50 = math::sma(&closes, 50).or_else(|| math::mean(&closes))?;
        let ema10 = math::ema(&closes, 10)?;
        let ema50 = math::ema(&closes, 50).or_else(|| math::mean(&closes))?;

        let levels = support_resistance(points, LOOKBACK)?;
        let fibs = retracement_levels(levels.resistance, levels.support);
        let volume = volume_ratio(points, LOOKBACK)?;

        let trend = classify_trend(price, sma10, sma50);
        let rising = closes.len() >= 2 && price > closes[closes.len() - 2];

        let confidence_scale = if history.synthetic {
            SYNTHETIC_CONFIDENCE_SCALE
        } else {
            1.0
        };
        let ctx = RuleContext {
            price,
            rsi,
            macd: &macd,
            support: levels.support,
            resistance: levels.resistance,
            fibs: &fibs,
            volume: &volume,
            rising,
            confidence_scale,
        };
        let signals = entry_rules::evaluate(&ctx);
        let overall_quality = entry_rules::overall_quality(&signals, trend);

        Some(IndicatorSnapshot {
            rsi,
            macd: macd.macd,
            macd_signal: macd.signal,
            sma10,
            sma50,
            ema10,
            ema50,
            support_level: levels.support,
            resistance_level: levels.resistance,
            fib38: fibs.fib38,
            fib50: fibs.fib50,
            fib61: fibs.fib61,
            avg_volume20: volume.average,
            current_volume: volume.current,
            volume_ratio: volume.ratio,
            trend,
            signals,
            overall_quality,
            synthetic: history.synthetic,
            computed_at: Utc::now(),
        })
    }
}

/// Bullish when the short average leads the long one and price sits above
/// both; bearish on the inverse; neutral otherwise.
fn classify_trend(price: f64, sma10: f64, sma50: f64) -> Trend {
    if sma10 > sma50 && price > sma10 && price > sma50 {
        Trend::Bullish
    } else if sma10 < sma50 && price < sma10 && price < sma50 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}
