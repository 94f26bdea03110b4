//! Market-data access and per-asset analysis services.

pub mod analyzer;
pub mod market_data;
pub mod upstream;

pub use analyzer::AssetAnalyzer;
pub use market_data::{synthesize_fallback, FetcherConfig, MarketDataFetcher};
pub use upstream::{HttpUpstreamClient, UpstreamClient};
