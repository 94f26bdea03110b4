//! Tracked-asset record shared between consumers and the analysis core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::indicators::IndicatorSnapshot;
use crate::models::score::{EntryScore, ScoreSource};

/// Analysis lifecycle of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Never analyzed.
    Pending,
    /// An analysis step is in flight.
    Loading,
    /// A score is present, produced by the given path.
    Scored(ScoreSource),
    /// The last analysis produced no usable indicators. Any previously
    /// good score is left in place.
    Error,
}

/// One asset the consumer tracks.
///
/// The consumer (portfolio or watchlist) owns the record; the core only
/// reads identity/targets and writes the price and analysis fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedAsset {
    /// Upstream vendor id, e.g. "bitcoin".
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub entry_target: Option<f64>,
    pub target_3m: Option<f64>,
    pub target_long: Option<f64>,
    pub holdings: Option<f64>,
    pub avg_cost: Option<f64>,
    pub snapshot: Option<IndicatorSnapshot>,
    pub score: Option<EntryScore>,
    pub status: AnalysisStatus,
    pub price_updated_at: Option<DateTime<Utc>>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl TrackedAsset {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price: 0.0,
            entry_target: None,
            target_3m: None,
            target_long: None,
            holdings: None,
            avg_cost: None,
            snapshot: None,
            score: None,
            status: AnalysisStatus::Pending,
            price_updated_at: None,
            analyzed_at: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = price;
        self
    }

    pub fn with_entry_target(mut self, target: f64) -> Self {
        self.entry_target = Some(target);
        self
    }

    pub fn with_targets(mut self, three_month: f64, long_term: f64) -> Self {
        self.target_3m = Some(three_month);
        self.target_long = Some(long_term);
        self
    }

    pub fn with_holdings(mut self, holdings: f64, avg_cost: f64) -> Self {
        self.holdings = Some(holdings);
        self.avg_cost = Some(avg_cost);
        self
    }
}
