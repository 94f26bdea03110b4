//! Price series models produced by the market-data layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical OHLCV bar. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A fetched price series for one asset.
///
/// `synthetic` marks a series generated by the fallback synthesizer because
/// the upstream could not be reached; downstream consumers discount signal
/// confidence for such data but never treat it as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub points: Vec<PricePoint>,
    pub synthetic: bool,
}

impl PriceHistory {
    pub fn real(points: Vec<PricePoint>) -> Self {
        Self {
            points,
            synthetic: false,
        }
    }

    pub fn synthetic_series(points: Vec<PricePoint>) -> Self {
        Self {
            points,
            synthetic: true,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
