//! Shared read-through cache for upstream responses.
//!
//! One namespace per data kind (spot price, OHLC history, market metadata),
//! each with its own TTL and statistics. Kinds share no key space: the same
//! asset id is an independent key in every namespace.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::cache::ttl::TtlCache;
use crate::models::price::PricePoint;

/// Per-kind time-to-live settings.
#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub price: Duration,
    pub history: Duration,
    pub metadata: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            price: Duration::from_secs(60),
            history: Duration::from_secs(300),
            metadata: Duration::from_secs(600),
        }
    }
}

/// Lightweight market metadata refreshed alongside bulk price calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMetadata {
    pub id: String,
    pub last_price: f64,
    pub updated_at: DateTime<Utc>,
}

impl MarketMetadata {
    pub fn spot(id: &str, last_price: f64) -> Self {
        Self {
            id: id.to_string(),
            last_price,
            updated_at: Utc::now(),
        }
    }
}

/// Aggregated cache observability snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub price_entries: usize,
    pub history_entries: usize,
    pub metadata_entries: usize,
}

/// Process-wide response cache shared by all consumers.
pub struct ResponseCache {
    ttls: CacheTtls,
    prices: Mutex<TtlCache<f64>>,
    history: Mutex<TtlCache<Vec<PricePoint>>>,
    metadata: Mutex<TtlCache<MarketMetadata>>,
}

impl ResponseCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            ttls,
            prices: Mutex::new(TtlCache::new()),
            history: Mutex::new(TtlCache::new()),
            metadata: Mutex::new(TtlCache::new()),
        }
    }

    pub async fn price(&self, id: &str) -> Option<f64> {
        self.prices.lock().await.get(id)
    }

    pub async fn put_price(&self, id: &str, price: f64) {
        self.prices.lock().await.put(id, price, self.ttls.price);
    }

    pub async fn history(&self, id: &str) -> Option<Vec<PricePoint>> {
        self.history.lock().await.get(id)
    }

    /// Stale-tolerant history read, used only when the coordinator denies a
    /// network call and any data beats none.
    pub async fn history_stale(&self, id: &str) -> Option<Vec<PricePoint>> {
        self.history.lock().await.get_stale(id)
    }

    pub async fn put_history(&self, id: &str, points: Vec<PricePoint>) {
        self.history.lock().await.put(id, points, self.ttls.history);
    }

    pub async fn metadata(&self, id: &str) -> Option<MarketMetadata> {
        self.metadata.lock().await.get(id)
    }

    pub async fn put_metadata(&self, id: &str, meta: MarketMetadata) {
        self.metadata.lock().await.put(id, meta, self.ttls.metadata);
    }

    /// Drop the id from every namespace.
    pub async fn invalidate(&self, id: &str) {
        self.prices.lock().await.invalidate(id);
        self.history.lock().await.invalidate(id);
        self.metadata.lock().await.invalidate(id);
    }

    /// Eagerly drop expired entries from every namespace.
    pub async fn sweep_expired(&self) {
        self.prices.lock().await.sweep();
        self.history.lock().await.sweep();
        self.metadata.lock().await.sweep();
    }

    pub async fn stats(&self) -> CacheStats {
        let prices = self.prices.lock().await;
        let history = self.history.lock().await;
        let metadata = self.metadata.lock().await;
        CacheStats {
            hits: prices.hits() + history.hits() + metadata.hits(),
            misses: prices.misses() + history.misses() + metadata.misses(),
            price_entries: prices.len(),
            history_entries: history.len(),
            metadata_entries: metadata.len(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}
