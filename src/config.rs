//! Runtime configuration sourced from environment variables.

use std::time::Duration;

/// Deployment environment name, used to pick the log format.
pub fn get_environment() -> String {
    std::env::var("ENTRIX_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Tunables for the coordination, caching, fetching, and scheduling layers.
///
/// `Default` carries the production constants; `from_env` overlays any
/// `ENTRIX_*` variables on top of them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream market-data API.
    pub base_url: String,
    /// Quote currency for prices and OHLC data.
    pub vs_currency: String,
    /// Connect/read timeout for each HTTP call.
    pub http_timeout: Duration,
    /// Minimum interval between any two upstream calls, process-wide.
    pub min_call_interval: Duration,
    /// Spot-price cache TTL.
    pub price_ttl: Duration,
    /// OHLC history cache TTL.
    pub history_ttl: Duration,
    /// Market-metadata cache TTL.
    pub metadata_ttl: Duration,
    /// First retry delay; doubles per attempt.
    pub retry_base_delay: Duration,
    /// Upper bound on any single retry delay.
    pub retry_max_delay: Duration,
    /// Retries after the initial attempt before falling back.
    pub max_retries: usize,
    /// Length of the synthesized fallback series, in daily bars.
    pub fallback_days: usize,
    /// History window requested from the upstream, in days.
    pub history_days: u32,
    /// Pause between consecutive assets in an analysis run.
    pub inter_item_delay: Duration,
    /// Minimum spacing between the starts of two analysis runs.
    pub run_cooldown: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            http_timeout: Duration::from_secs(10),
            min_call_interval: Duration::from_secs(2),
            price_ttl: Duration::from_secs(60),
            history_ttl: Duration::from_secs(300),
            metadata_ttl: Duration::from_secs(600),
            retry_base_delay: Duration::from_secs(5),
            retry_max_delay: Duration::from_secs(60),
            max_retries: 3,
            fallback_days: 30,
            history_days: 90,
            inter_item_delay: Duration::from_secs(12),
            run_cooldown: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Load the default configuration with `ENTRIX_*` environment overrides.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(url) = std::env::var("ENTRIX_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(currency) = std::env::var("ENTRIX_VS_CURRENCY") {
            config.vs_currency = currency;
        }
        if let Some(secs) = env_secs("ENTRIX_HTTP_TIMEOUT_SECONDS") {
            config.http_timeout = secs;
        }
        if let Some(secs) = env_secs("ENTRIX_MIN_CALL_INTERVAL_SECONDS") {
            config.min_call_interval = secs;
        }
        if let Some(secs) = env_secs("ENTRIX_PRICE_TTL_SECONDS") {
            config.price_ttl = secs;
        }
        if let Some(secs) = env_secs("ENTRIX_HISTORY_TTL_SECONDS") {
            config.history_ttl = secs;
        }
        if let Some(secs) = env_secs("ENTRIX_INTER_ITEM_DELAY_SECONDS") {
            config.inter_item_delay = secs;
        }
        if let Some(secs) = env_secs("ENTRIX_RUN_COOLDOWN_SECONDS") {
            config.run_cooldown = secs;
        }
        config
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}
