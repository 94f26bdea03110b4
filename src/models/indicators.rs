//! Technical-analysis output models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

/// Five-level entry quality derived from the active signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryQuality {
    Excellent,
    Good,
    Average,
    Poor,
    VeryPoor,
}

impl EntryQuality {
    /// Fixed quality-to-score mapping used by the scorer.
    pub fn score(self) -> f64 {
        match self {
            EntryQuality::Excellent => 95.0,
            EntryQuality::Good => 80.0,
            EntryQuality::Average => 60.0,
            EntryQuality::Poor => 30.0,
            EntryQuality::VeryPoor => 10.0,
        }
    }

    /// One level worse, saturating at the bottom.
    pub fn demote(self) -> Self {
        match self {
            EntryQuality::Excellent => EntryQuality::Good,
            EntryQuality::Good => EntryQuality::Average,
            EntryQuality::Average => EntryQuality::Poor,
            EntryQuality::Poor | EntryQuality::VeryPoor => EntryQuality::VeryPoor,
        }
    }
}

/// Technique that produced an entry signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTechnique {
    OversoldBounce,
    MacdCrossover,
    SupportBounce,
    VolumeBreakout,
    FibRetracement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl SignalStrength {
    /// Vote weight of a signal of this strength.
    pub fn weight(self) -> f64 {
        match self {
            SignalStrength::VeryStrong => 1.0,
            SignalStrength::Strong => 0.8,
            SignalStrength::Moderate => 0.6,
            SignalStrength::Weak => 0.4,
            SignalStrength::VeryWeak => 0.2,
        }
    }

    /// Strength from the normalized magnitude of the rule's deviation,
    /// where 0.0 is a marginal trigger and 1.0 a maximal one.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 0.8 {
            SignalStrength::VeryStrong
        } else if magnitude >= 0.6 {
            SignalStrength::Strong
        } else if magnitude >= 0.4 {
            SignalStrength::Moderate
        } else if magnitude >= 0.2 {
            SignalStrength::Weak
        } else {
            SignalStrength::VeryWeak
        }
    }
}

/// A discrete, technique-tagged entry recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySignal {
    pub technique: SignalTechnique,
    pub strength: SignalStrength,
    pub description: String,
    pub target_price: f64,
    pub stop_loss: f64,
    /// In `[0, 1]`; halved when computed from synthetic data.
    pub confidence: f64,
}

/// Full indicator readout for one asset at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma10: f64,
    pub sma50: f64,
    pub ema10: f64,
    pub ema50: f64,
    pub support_level: f64,
    pub resistance_level: f64,
    pub fib38: f64,
    pub fib50: f64,
    pub fib61: f64,
    pub avg_volume20: f64,
    pub current_volume: f64,
    pub volume_ratio: f64,
    pub trend: Trend,
    pub signals: Vec<EntrySignal>,
    pub overall_quality: EntryQuality,
    /// True when computed from a synthesized fallback series.
    pub synthetic: bool,
    pub computed_at: DateTime<Utc>,
}
