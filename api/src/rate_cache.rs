//! Handles the caching logic for external price provider data.

use std::sync::RwLock as SnapshotLock;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::exchange_rates::ExchangeRates;
use crate::price_providers::PriceProvider;
use crate::ApiError;

/// Default time a fetched set of rates stays fresh.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60);

/// A synchronous source of the most recent exchange-rate snapshot.
///
/// Consumers read a snapshot and never mutate it.
pub trait RateSource: Send + Sync {
    fn exchange_rates(&self) -> ExchangeRates;
}

/// A fixed snapshot is its own source.
impl RateSource for ExchangeRates {
    fn exchange_rates(&self) -> ExchangeRates {
        self.clone()
    }
}

#[derive(Clone, Debug)]
struct CachedRates {
    rates: ExchangeRates,
    last_fetched: Instant,
}

/// A lazy, time-based cache in front of a `PriceProvider`.
///
/// The provider is only called when the cache is empty or older than the
/// cache duration. The last successful fetch is also kept as a synchronous
/// snapshot for `RateSource` readers.
pub struct RateCache<P> {
    provider: P,
    cache_duration: Duration,
    cache: RwLock<Option<CachedRates>>,
    latest: SnapshotLock<ExchangeRates>,
}

impl<P: PriceProvider> RateCache<P> {
    pub fn new(provider: P) -> Self {
        Self::with_duration(provider, DEFAULT_CACHE_DURATION)
    }

    pub fn with_duration(provider: P, cache_duration: Duration) -> Self {
        Self {
            provider,
            cache_duration,
            cache: RwLock::new(None),
            latest: SnapshotLock::new(ExchangeRates::new()),
        }
    }

    /// Returns fresh rates, fetching from the provider if the cache is stale.
    pub async fn get_rates(&self) -> Result<ExchangeRates, ApiError> {
        // Check for a valid, non-stale entry with a read lock first.
        {
            let read_lock = self.cache.read().await;
            if let Some(cache) = &*read_lock {
                if cache.last_fetched.elapsed() < self.cache_duration {
                    return Ok(cache.rates.clone());
                }
            }
        }

        let mut write_lock = self.cache.write().await;

        // Another task may have refreshed while we waited for the write lock.
        if let Some(cache) = &*write_lock {
            if cache.last_fetched.elapsed() < self.cache_duration {
                return Ok(cache.rates.clone());
            }
        }

        tracing::debug!("exchange rate cache stale, fetching");
        let rates = self.provider.get_prices().await.inspect_err(|e| {
            tracing::warn!("exchange rate fetch failed: {e}");
        })?;

        *write_lock = Some(CachedRates {
            rates: rates.clone(),
            last_fetched: Instant::now(),
        });
        self.store_snapshot(rates.clone());

        Ok(rates)
    }

    fn store_snapshot(&self, rates: ExchangeRates) {
        match self.latest.write() {
            Ok(mut guard) => *guard = rates,
            Err(poisoned) => *poisoned.into_inner() = rates,
        }
    }
}

impl<P: PriceProvider + Send + Sync> RateSource for RateCache<P> {
    fn exchange_rates(&self) -> ExchangeRates {
        match self.latest.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiat_currency::FiatCurrency;
    use crate::money::Money;
    use std::sync::atomic::AtomicI64;
    use std::sync::atomic::Ordering;

    /// Quotes an ever-increasing USD price so each fetch is distinguishable.
    struct CountingProvider {
        fetches: AtomicI64,
    }

    impl PriceProvider for CountingProvider {
        async fn get_prices(&self) -> Result<ExchangeRates, ApiError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ExchangeRates::new().with_price(Money::fiat(n, FiatCurrency::USD)))
        }
    }

    struct FailingProvider;

    impl PriceProvider for FailingProvider {
        async fn get_prices(&self) -> Result<ExchangeRates, ApiError> {
            Err(anyhow::anyhow!("provider offline"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_rates_until_stale() {
        let cache = RateCache::with_duration(
            CountingProvider {
                fetches: AtomicI64::new(0),
            },
            Duration::from_secs(60),
        );
        assert!(cache.exchange_rates().is_empty());

        let first = cache.get_rates().await.unwrap();
        let second = cache.get_rates().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.exchange_rates(), first);

        tokio::time::advance(Duration::from_secs(61)).await;
        let third = cache.get_rates().await.unwrap();
        assert_eq!(
            third.get(FiatCurrency::USD),
            Some(Money::fiat(2, FiatCurrency::USD))
        );
        assert_eq!(cache.exchange_rates(), third);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let cache = RateCache::new(FailingProvider);
        assert!(cache.get_rates().await.is_err());
        assert!(cache.exchange_rates().is_empty());
    }
}
