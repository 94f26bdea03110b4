//! Upstream REST endpoints for spot prices and OHLC history.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{FetchError, FetchResult};
use crate::models::price::PricePoint;

/// Seam over the upstream market-data API.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Spot prices for a batch of asset ids in one call.
    ///
    /// Ids absent from the response are unknown, not an error.
    async fn simple_prices(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> FetchResult<HashMap<String, f64>>;

    /// Time-ordered OHLCV history for one asset.
    async fn ohlc_history(
        &self,
        id: &str,
        vs_currency: &str,
        days: u32,
    ) -> FetchResult<Vec<PricePoint>>;
}

/// One `[ts_millis, open, high, low, close, volume]` row on the wire.
#[derive(Debug, Deserialize)]
struct OhlcRow(i64, f64, f64, f64, f64, f64);

/// reqwest-backed implementation of [`UpstreamClient`].
pub struct HttpUpstreamClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Inject a preconfigured client, e.g. one pointed at a mock server.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn simple_prices(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> FetchResult<HashMap<String, f64>> {
        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids.join(",").as_str()), ("vs_currency", vs_currency)])
            .send()
            .await
            .map_err(FetchError::from)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        let response = response.error_for_status().map_err(FetchError::from)?;

        let body: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        Ok(body
            .into_iter()
            .filter_map(|(id, quotes)| quotes.get(vs_currency).map(|&price| (id, price)))
            .collect())
    }

    async fn ohlc_history(
        &self,
        id: &str,
        vs_currency: &str,
        days: u32,
    ) -> FetchResult<Vec<PricePoint>> {
        let url = format!("{}/coins/{}/ohlc", self.base_url, id);
        let days = days.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("vs_currency", vs_currency), ("days", days.as_str())])
            .send()
            .await
            .map_err(FetchError::from)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        let response = response.error_for_status().map_err(FetchError::from)?;

        let rows: Vec<OhlcRow> = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let timestamp = DateTime::from_timestamp_millis(row.0).ok_or_else(|| {
                FetchError::MalformedResponse(format!("timestamp out of range: {}", row.0))
            })?;
            points.push(PricePoint::new(row.1, row.2, row.3, row.4, row.5, timestamp));
        }
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}
