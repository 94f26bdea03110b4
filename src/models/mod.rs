//! Shared data models spanning the engine layers.

pub mod asset;
pub mod indicators;
pub mod price;
pub mod score;

pub use asset::{AnalysisStatus, TrackedAsset};
pub use indicators::{
    EntryQuality, EntrySignal, IndicatorSnapshot, SignalStrength, SignalTechnique, Trend,
};
pub use price::{PriceHistory, PricePoint};
pub use score::{EntryScore, EntrySignalClass, ScoreSource};
