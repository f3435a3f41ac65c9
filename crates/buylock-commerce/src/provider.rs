//! Exchange-rate provider with a time-based cache in durable storage.

#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buylock_store::Store;
use serde::Serialize;

use crate::error::CommerceError;
use crate::keys;
use crate::rates::RateTable;

/// How long a cached table is served without asking the endpoint again.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_millis(3_600_000);

/// Upstream supplier of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the current table. Called at most once per load.
    async fn fetch(&self) -> Result<RateTable, CommerceError>;
}

/// Rate source backed by the marketplace's exchange-rates endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpRateSource {
    /// Create a source for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CommerceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<RateTable, CommerceError> {
        let response = self.http.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(CommerceError::RateFetch(format!(
                "{} returned status {}",
                self.endpoint,
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        RateTable::from_json(body)
    }
}

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FixedClock {
    now_ms: AtomicU64,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    /// Durable storage, still within the TTL.
    Cache,
    /// A successful endpoint request.
    Network,
    /// The static table, after the endpoint failed.
    Fallback,
}

/// A table read back from durable storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRates {
    pub table: RateTable,
    /// Milliseconds since the Unix epoch when the table was fetched.
    pub fetched_at: u64,
}

/// Result of [`ExchangeRateProvider::load`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLoad {
    pub table: RateTable,
    pub origin: RateOrigin,
    /// Fetch time of the table, absent for the fallback table.
    pub fetched_at: Option<u64>,
}

/// Supplies a rate table, preferring a recent cached copy.
///
/// Storage is best-effort throughout: read failures count as a cache miss and
/// write failures are logged, never returned.
pub struct ExchangeRateProvider {
    store: Store,
    source: Arc<dyn RateSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl ExchangeRateProvider {
    /// Create a provider using the system clock and the default TTL.
    pub fn new(store: Store, source: Arc<dyn RateSource>) -> Self {
        Self {
            store,
            source,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_RATE_TTL,
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the cache TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The configured cache TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the cached table and its timestamp.
    ///
    /// `Ok(None)` when either half is missing.
    pub fn cached(&self) -> Result<Option<CachedRates>, CommerceError> {
        let table: Option<RateTable> = self.store.get(&keys::exchange_rates())?;
        let fetched_at: Option<u64> = self.store.get(&keys::exchange_rates_timestamp())?;

        Ok(match (table, fetched_at) {
            (Some(table), Some(fetched_at)) => Some(CachedRates { table, fetched_at }),
            _ => None,
        })
    }

    /// Whether a cached table is younger than the TTL.
    pub fn is_fresh(&self, cached: &CachedRates) -> bool {
        let age = self.clock.now_ms().saturating_sub(cached.fetched_at);
        u128::from(age) < self.ttl.as_millis()
    }

    /// Load rates: fresh cache, else the endpoint, else the fallback table.
    pub async fn load(&self) -> RateLoad {
        match self.cached() {
            Ok(Some(cached)) if self.is_fresh(&cached) => {
                tracing::debug!(fetched_at = cached.fetched_at, "using cached exchange rates");
                return RateLoad {
                    table: cached.table,
                    origin: RateOrigin::Cache,
                    fetched_at: Some(cached.fetched_at),
                };
            }
            Ok(Some(_)) => tracing::debug!("cached exchange rates are stale"),
            Ok(None) => tracing::debug!("no cached exchange rates"),
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable exchange rate cache"),
        }

        self.refresh().await
    }

    /// Skip the cache and ask the endpoint, falling back on failure.
    pub async fn refresh(&self) -> RateLoad {
        match self.source.fetch().await {
            Ok(table) => {
                let now = self.clock.now_ms();
                self.persist(&table, now);
                tracing::info!(entries = table.len(), "fetched exchange rates");
                RateLoad {
                    table,
                    origin: RateOrigin::Network,
                    fetched_at: Some(now),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "exchange rate fetch failed, using fallback rates");
                RateLoad {
                    table: RateTable::fallback(),
                    origin: RateOrigin::Fallback,
                    fetched_at: None,
                }
            }
        }
    }

    fn persist(&self, table: &RateTable, now: u64) {
        let written = self
            .store
            .set(&keys::exchange_rates(), table)
            .and_then(|()| self.store.set(&keys::exchange_rates_timestamp(), &now));

        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to cache exchange rates");
        }
    }
}
