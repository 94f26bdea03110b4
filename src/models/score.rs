//! Entry-quality score models.

use serde::{Deserialize, Serialize};

/// Discrete action class derived from the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySignalClass {
    StrongBuy,
    Buy,
    Neutral,
    Wait,
    Avoid,
}

impl EntrySignalClass {
    /// Threshold table: >=85 StrongBuy, >=70 Buy, >=40 Neutral, >=20 Wait.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            EntrySignalClass::StrongBuy
        } else if score >= 70.0 {
            EntrySignalClass::Buy
        } else if score >= 40.0 {
            EntrySignalClass::Neutral
        } else if score >= 20.0 {
            EntrySignalClass::Wait
        } else {
            EntrySignalClass::Avoid
        }
    }
}

/// Which scoring path produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Technical,
    TargetRatio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryScore {
    /// In `[0, 100]`.
    pub score: f64,
    pub signal: EntrySignalClass,
    pub source: ScoreSource,
}
