//! Prometheus metrics for the coordination and analysis layers.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

/// Process-wide metrics registry.
///
/// Passed around as `Option<Arc<Metrics>>`; every component degrades to
/// no-op counting when absent.
pub struct Metrics {
    registry: Registry,
    pub api_calls_total: IntCounter,
    pub api_calls_denied_total: IntCounter,
    pub rate_limited_total: IntCounter,
    pub fallback_series_total: IntCounter,
    pub analysis_runs_total: IntCounter,
    pub assets_analyzed_total: IntCounter,
    pub analysis_failures_total: IntCounter,
    pub analysis_run_active: IntGauge,
    pub fetch_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let api_calls_total =
            IntCounter::new("entrix_api_calls_total", "Granted upstream API calls")?;
        let api_calls_denied_total = IntCounter::new(
            "entrix_api_calls_denied_total",
            "Upstream API calls denied by the rate coordinator",
        )?;
        let rate_limited_total = IntCounter::new(
            "entrix_rate_limited_total",
            "Upstream responses that were rate limited (HTTP 429)",
        )?;
        let fallback_series_total = IntCounter::new(
            "entrix_fallback_series_total",
            "Synthetic fallback histories generated",
        )?;
        let analysis_runs_total =
            IntCounter::new("entrix_analysis_runs_total", "Sequential analysis runs started")?;
        let assets_analyzed_total =
            IntCounter::new("entrix_assets_analyzed_total", "Assets scored successfully")?;
        let analysis_failures_total = IntCounter::new(
            "entrix_analysis_failures_total",
            "Assets whose analysis ended in an error state",
        )?;
        let analysis_run_active = IntGauge::new(
            "entrix_analysis_run_active",
            "Whether a sequential analysis run is in progress",
        )?;
        let fetch_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "entrix_fetch_duration_seconds",
            "Wall time of history fetches including retries",
        ))?;

        registry.register(Box::new(api_calls_total.clone()))?;
        registry.register(Box::new(api_calls_denied_total.clone()))?;
        registry.register(Box::new(rate_limited_total.clone()))?;
        registry.register(Box::new(fallback_series_total.clone()))?;
        registry.register(Box::new(analysis_runs_total.clone()))?;
        registry.register(Box::new(assets_analyzed_total.clone()))?;
        registry.register(Box::new(analysis_failures_total.clone()))?;
        registry.register(Box::new(analysis_run_active.clone()))?;
        registry.register(Box::new(fetch_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            api_calls_total,
            api_calls_denied_total,
            rate_limited_total,
            fallback_series_total,
            analysis_runs_total,
            assets_analyzed_total,
            analysis_failures_total,
            analysis_run_active,
            fetch_duration_seconds,
        })
    }

    /// Export all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
