//! Entry-signal rule set.
//!
//! Each rule is evaluated independently against the computed indicators and
//! yields at most one technique-tagged signal. Strength scales with how far
//! the trigger deviates from its threshold.

use crate::indicators::momentum::MacdOutput;
use crate::indicators::structure::FibLevels;
use crate::indicators::volume::VolumeProfile;
use crate::models::indicators::{EntryQuality, EntrySignal, SignalStrength, SignalTechnique, Trend};

const RSI_OVERSOLD: f64 = 30.0;
const SUPPORT_PROXIMITY: f64 = 0.01;
const FIB_PROXIMITY: f64 = 0.01;
const BREAKOUT_VOLUME_RATIO: f64 = 1.5;

pub(crate) struct RuleContext<'a> {
    pub price: f64,
    pub rsi: f64,
    pub macd: &'a MacdOutput,
    pub support: f64,
    pub resistance: f64,
    pub fibs: &'a FibLevels,
    pub volume: &'a VolumeProfile,
    /// Last close above the previous close.
    pub rising: bool,
    /// 1.0 for real data, lower for synthetic fallback series.
    pub confidence_scale: f64,
}

pub(crate) fn evaluate(ctx: &RuleContext) -> Vec<EntrySignal> {
    [
        oversold_rule(ctx),
        macd_crossover_rule(ctx),
        support_bounce_rule(ctx),
        volume_breakout_rule(ctx),
        fib_retracement_rule(ctx),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// RSI below 30: the further below, the stronger the signal.
fn oversold_rule(ctx: &RuleContext) -> Option<EntrySignal> {
    if ctx.rsi >= RSI_OVERSOLD {
        return None;
    }
    let magnitude = ((RSI_OVERSOLD - ctx.rsi) / RSI_OVERSOLD).clamp(0.0, 1.0);
    Some(EntrySignal {
        technique: SignalTechnique::OversoldBounce,
        strength: SignalStrength::from_magnitude(magnitude),
        description: format!("RSI oversold at {:.1}", ctx.rsi),
        target_price: ctx.fibs.fib50,
        stop_loss: ctx.support * 0.97,
        confidence: ((0.5 + magnitude * 0.4) * ctx.confidence_scale).clamp(0.0, 1.0),
    })
}

/// MACD line crossing above its signal line on the current bar.
fn macd_crossover_rule(ctx: &RuleContext) -> Option<EntrySignal> {
    if !ctx.macd.crossed_above {
        return None;
    }
    let magnitude = (ctx.macd.histogram.abs() / (ctx.macd.macd.abs() + 0.001)).clamp(0.0, 1.0);
    Some(EntrySignal {
        technique: SignalTechnique::MacdCrossover,
        strength: SignalStrength::from_magnitude(magnitude),
        description: format!(
            "MACD crossed above signal ({:.4} > {:.4})",
            ctx.macd.macd, ctx.macd.signal
        ),
        target_price: ctx.resistance,
        stop_loss: ctx.price * 0.95,
        confidence: ((0.5 + magnitude * 0.3) * ctx.confidence_scale).clamp(0.0, 1.0),
    })
}

/// Price sitting within 1% above the support level.
fn support_bounce_rule(ctx: &RuleContext) -> Option<EntrySignal> {
    if ctx.support <= 0.0 || ctx.price < ctx.support {
        return None;
    }
    let distance = (ctx.price - ctx.support) / ctx.support;
    if distance > SUPPORT_PROXIMITY {
        return None;
    }
    let magnitude = (1.0 - distance / SUPPORT_PROXIMITY).clamp(0.0, 1.0);
    Some(EntrySignal {
        technique: SignalTechnique::SupportBounce,
        strength: SignalStrength::from_magnitude(magnitude),
        description: format!(
            "price {:.2} within {:.1}% of support {:.2}",
            ctx.price,
            distance * 100.0,
            ctx.support
        ),
        target_price: ctx.fibs.fib61,
        stop_loss: ctx.support * 0.98,
        confidence: ((0.45 + magnitude * 0.35) * ctx.confidence_scale).clamp(0.0, 1.0),
    })
}

/// Volume surge above 1.5x the trailing average on a rising close.
fn volume_breakout_rule(ctx: &RuleContext) -> Option<EntrySignal> {
    if !ctx.rising || ctx.volume.ratio <= BREAKOUT_VOLUME_RATIO {
        return None;
    }
    let magnitude = ((ctx.volume.ratio - BREAKOUT_VOLUME_RATIO) / BREAKOUT_VOLUME_RATIO)
        .clamp(0.0, 1.0);
    Some(EntrySignal {
        technique: SignalTechnique::VolumeBreakout,
        strength: SignalStrength::from_magnitude(magnitude),
        description: format!("volume {:.1}x average on a rising close", ctx.volume.ratio),
        target_price: ctx.price.max(ctx.resistance) * 1.02,
        stop_loss: ctx.price * 0.97,
        confidence: ((0.5 + magnitude * 0.3) * ctx.confidence_scale).clamp(0.0, 1.0),
    })
}

/// Price within 1% of the nearest Fibonacci retracement level.
fn fib_retracement_rule(ctx: &RuleContext) -> Option<EntrySignal> {
    let (level, label) = ctx.fibs.nearest(ctx.price);
    if level <= 0.0 {
        return None;
    }
    let distance = (ctx.price - level).abs() / level;
    if distance > FIB_PROXIMITY {
        return None;
    }
    let magnitude = (1.0 - distance / FIB_PROXIMITY).clamp(0.0, 1.0);
    // Target the next level up; at the top level aim for the window high.
    let target = if level <= ctx.fibs.fib61 {
        ctx.fibs.fib50
    } else if level <= ctx.fibs.fib50 {
        ctx.fibs.fib38
    } else {
        ctx.resistance
    };
    Some(EntrySignal {
        technique: SignalTechnique::FibRetracement,
        strength: SignalStrength::from_magnitude(magnitude),
        description: format!("price {:.2} at the {} retracement {:.2}", ctx.price, label, level),
        target_price: target,
        stop_loss: level * 0.97,
        confidence: ((0.4 + magnitude * 0.35) * ctx.confidence_scale).clamp(0.0, 1.0),
    })
}

/// Collapse the active signals into the five-level quality enum.
///
/// The vote sums `strength weight x confidence` over all signals; a bearish
/// trend demotes the result one level. With no active signal the read is
/// neutral-market: Average in an uptrend, Poor otherwise, VeryPoor when
/// also bearish.
pub(crate) fn overall_quality(signals: &[EntrySignal], trend: Trend) -> EntryQuality {
    if signals.is_empty() {
        return match trend {
            Trend::Bullish => EntryQuality::Average,
            Trend::Neutral => EntryQuality::Poor,
            Trend::Bearish => EntryQuality::VeryPoor,
        };
    }

    let vote: f64 = signals
        .iter()
        .map(|s| s.strength.weight() * s.confidence)
        .sum();
    let quality = if vote >= 1.6 {
        EntryQuality::Excellent
    } else if vote >= 1.0 {
        EntryQuality::Good
    } else if vote >= 0.5 {
        EntryQuality::Average
    } else if vote >= 0.25 {
        EntryQuality::Poor
    } else {
        EntryQuality::VeryPoor
    };

    if trend == Trend::Bearish {
        quality.demote()
    } else {
        quality
    }
}
