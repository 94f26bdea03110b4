//! Process-wide gatekeeper for upstream API access.
//!
//! All consumers share one `RateCoordinator`. It enforces a minimum interval
//! between any two upstream calls and an exclusive "intensive operation"
//! lock so at most one consumer runs a long analysis cycle while the others
//! downgrade to cache-only behavior.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What an API grant is being requested for. Logged for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiPurpose {
    PriceRefresh,
    BulkPrices,
    HistoryFetch,
    Analysis,
}

#[derive(Debug, Default)]
struct CoordinationState {
    /// Instant of the last granted call. Only advances.
    last_call_at: Option<Instant>,
    /// Consumer currently holding the intensive-operation lock, if any.
    intensive_owner: Option<String>,
}

/// Mutex-guarded coordination state. Every operation is a short critical
/// section; nothing sleeps while holding the lock.
pub struct RateCoordinator {
    min_interval: Duration,
    state: Mutex<CoordinationState>,
}

impl RateCoordinator {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(CoordinationState::default()),
        }
    }

    /// Non-blocking permission check that consumes the rate budget on grant.
    ///
    /// A denial means the caller must skip this cycle, not retry-spin.
    pub async fn request_api_call(&self, consumer: &str, purpose: ApiPurpose) -> bool {
        let mut state = self.state.lock().await;
        if !Self::admissible(&state, consumer, self.min_interval) {
            debug!(consumer = %consumer, purpose = ?purpose, "api call denied");
            return false;
        }
        state.last_call_at = Some(Instant::now());
        debug!(consumer = %consumer, purpose = ?purpose, "api call granted");
        true
    }

    /// Side-effect-free version of `request_api_call`, used by periodic
    /// refreshers to decide whether to attempt a call at all.
    pub async fn can_make_api_call(&self, consumer: &str, purpose: ApiPurpose) -> bool {
        let state = self.state.lock().await;
        let allowed = Self::admissible(&state, consumer, self.min_interval);
        debug!(consumer = %consumer, purpose = ?purpose, allowed, "api call probe");
        allowed
    }

    fn admissible(state: &CoordinationState, consumer: &str, min_interval: Duration) -> bool {
        if let Some(owner) = &state.intensive_owner {
            // The intensive owner itself keeps its own grants.
            if owner != consumer {
                return false;
            }
        }
        match state.last_call_at {
            Some(last) => Instant::now().duration_since(last) >= min_interval,
            None => true,
        }
    }

    /// Acquire the exclusive analysis-cycle lock.
    ///
    /// Starting while a different consumer holds it is a logged no-op
    /// denial, not an error. Re-acquiring as the current owner succeeds.
    pub async fn start_intensive(&self, consumer: &str) -> bool {
        let mut state = self.state.lock().await;
        match &state.intensive_owner {
            Some(owner) if owner != consumer => {
                warn!(
                    consumer = %consumer,
                    owner = %owner,
                    "intensive operation already held, denying start"
                );
                false
            }
            _ => {
                state.intensive_owner = Some(consumer.to_string());
                info!(consumer = %consumer, "intensive operation started");
                true
            }
        }
    }

    /// Release the lock. Releasing when not held (or held by someone else)
    /// is a no-op.
    pub async fn complete_intensive(&self, consumer: &str) {
        let mut state = self.state.lock().await;
        match &state.intensive_owner {
            Some(owner) if owner == consumer => {
                state.intensive_owner = None;
                info!(consumer = %consumer, "intensive operation complete");
            }
            Some(owner) => {
                warn!(
                    consumer = %consumer,
                    owner = %owner,
                    "ignoring intensive release from non-owner"
                );
            }
            None => {
                debug!(consumer = %consumer, "intensive release with none active");
            }
        }
    }

    pub async fn intensive_owner(&self) -> Option<String> {
        self.state.lock().await.intensive_owner.clone()
    }
}
