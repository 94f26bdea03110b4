//! Entrix - entry-quality analysis core.
//!
//! Coordinates many independent consumers over one rate-limited market-data
//! upstream: permission gating, TTL response caching, retry/backoff with
//! synthetic fallback, pure technical-indicator computation, entry scoring,
//! and a cancellable sequential analysis cycle.
//!
//! The composition root constructs one [`ResponseCache`] and one
//! [`RateCoordinator`] and hands them to every consumer; nothing in this
//! crate is a hidden global.

pub mod cache;
pub mod common;
pub mod config;
pub mod coordination;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod signals;

pub use cache::{CacheStats, CacheTtls, MarketMetadata, ResponseCache};
pub use config::Config;
pub use coordination::{ApiPurpose, RateCoordinator};
pub use error::{FetchError, FetchResult};
pub use metrics::Metrics;
pub use models::{
    AnalysisStatus, EntryQuality, EntryScore, EntrySignal, EntrySignalClass, IndicatorSnapshot,
    PriceHistory, PricePoint, ScoreSource, SignalStrength, SignalTechnique, TrackedAsset, Trend,
};
pub use scheduler::{RunOutcome, SchedulerConfig, SequentialAnalysisScheduler};
pub use services::{
    synthesize_fallback, AssetAnalyzer, FetcherConfig, HttpUpstreamClient, MarketDataFetcher,
    UpstreamClient,
};
pub use signals::{EntryScorer, IndicatorEngine};
