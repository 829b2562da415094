//! Market Data Gateway
//!
//! Cached, coalesced access to a [`MarketDataPort`]. Each operation has its
//! own [`CoalescingCache`] so TTLs can differ per data kind; keys are
//! `quote:{SYM}`, `expirations:{SYM}` and `chain:{SYM}:{YYYY-MM-DD}`.
//!
//! The gateway enforces no timeout. Callers that need one wrap the call
//! (see `GetQuoteUseCase`).

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use super::coalescing_cache::{CachePolicy, CoalescingCache, Lookup};
use super::normalize::{assemble_chain, extract_expirations, normalize_symbol};
use crate::application::ports::{MarketDataPort, ProviderError};
use crate::domain::market_data::{OptionChain, Quote};
use crate::observability::{record_gateway_request, record_provider_error};

/// Per-operation cache settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Quote entry lifetime.
    pub quote_ttl: Option<Duration>,
    /// Expiration list lifetime.
    pub expirations_ttl: Option<Duration>,
    /// Chain snapshot lifetime.
    pub chain_ttl: Option<Duration>,
    /// Capacity of each cache.
    pub max_entries: Option<usize>,
}

struct Inner {
    provider: Arc<dyn MarketDataPort>,
    quotes: CoalescingCache<Quote>,
    expirations: CoalescingCache<Vec<NaiveDate>>,
    chains: CoalescingCache<OptionChain>,
}

/// Caching, coalescing front for a market-data provider.
///
/// Cheap to clone; clones share caches.
#[derive(Clone)]
pub struct MarketDataGateway {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MarketDataGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataGateway")
            .field("quotes", &self.inner.quotes)
            .field("expirations", &self.inner.expirations)
            .field("chains", &self.inner.chains)
            .finish_non_exhaustive()
    }
}

fn observe<V>(
    operation: &'static str,
    key: &str,
    outcome: &(Result<Arc<V>, ProviderError>, Lookup),
) {
    let (result, lookup) = outcome;
    record_gateway_request(operation, lookup.as_str());
    match (result, lookup) {
        (Err(error), Lookup::Miss) => {
            record_provider_error(operation);
            tracing::warn!(key = %key, error = %error, "Provider call failed");
        }
        (Err(error), _) => {
            tracing::debug!(key = %key, error = %error, "Coalesced provider call failed");
        }
        (Ok(_), lookup) => {
            tracing::debug!(key = %key, outcome = lookup.as_str(), "Gateway lookup");
        }
    }
}

impl MarketDataGateway {
    /// Create a gateway over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn MarketDataPort>, config: GatewayConfig) -> Self {
        let policy = |ttl| CachePolicy {
            ttl,
            max_entries: config.max_entries,
        };
        Self {
            inner: Arc::new(Inner {
                provider,
                quotes: CoalescingCache::new(policy(config.quote_ttl)),
                expirations: CoalescingCache::new(policy(config.expirations_ttl)),
                chains: CoalescingCache::new(policy(config.chain_ttl)),
            }),
        }
    }

    /// Cache key for a quote.
    #[must_use]
    pub fn quote_key(symbol: &str) -> String {
        format!("quote:{}", normalize_symbol(symbol))
    }

    /// Cache key for an expiration list.
    #[must_use]
    pub fn expirations_key(symbol: &str) -> String {
        format!("expirations:{}", normalize_symbol(symbol))
    }

    /// Cache key for a chain.
    #[must_use]
    pub fn chain_key(symbol: &str, expiration: NaiveDate) -> String {
        format!(
            "chain:{}:{}",
            normalize_symbol(symbol),
            expiration.format("%Y-%m-%d")
        )
    }

    /// Latest price for a symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<Arc<Quote>, ProviderError> {
        let symbol = normalize_symbol(symbol);
        let key = Self::quote_key(&symbol);
        let provider = Arc::clone(&self.inner.provider);

        let outcome = self
            .inner
            .quotes
            .get_or_fetch(&key, move || async move { provider.get_quote(&symbol).await })
            .await;
        observe("quote", &key, &outcome);
        outcome.0
    }

    /// Sorted, deduplicated expirations listed for a symbol.
    pub async fn get_expirations(
        &self,
        symbol: &str,
    ) -> Result<Arc<Vec<NaiveDate>>, ProviderError> {
        let symbol = normalize_symbol(symbol);
        let key = Self::expirations_key(&symbol);
        let provider = Arc::clone(&self.inner.provider);

        let outcome = self
            .inner
            .expirations
            .get_or_fetch(&key, move || async move {
                let records = provider.list_contracts(&symbol).await?;
                Ok(extract_expirations(&records))
            })
            .await;
        observe("expirations", &key, &outcome);
        outcome.0
    }

    /// Chain for one expiration. A snapshot without an underlying price is
    /// completed with this gateway's own (cached) quote.
    pub async fn get_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<Arc<OptionChain>, ProviderError> {
        let symbol = normalize_symbol(symbol);
        let key = Self::chain_key(&symbol, expiration);
        let gateway = self.clone();

        let outcome = self
            .inner
            .chains
            .get_or_fetch(&key, move || async move {
                let snapshot = gateway
                    .inner
                    .provider
                    .get_chain_snapshot(&symbol, expiration)
                    .await?;
                let underlying = match snapshot.underlying_price {
                    Some(price) if price.is_finite() && price > 0.0 => price,
                    _ => gateway.get_quote(&symbol).await?.price,
                };
                let as_of = snapshot.as_of.unwrap_or_else(Utc::now);
                Ok(assemble_chain(
                    &symbol,
                    expiration,
                    underlying,
                    as_of,
                    &snapshot.records,
                ))
            })
            .await;
        observe("chain", &key, &outcome);
        outcome.0
    }

    /// Drop a cached value by key. In-flight calls are unaffected.
    pub fn invalidate(&self, key: &str) -> bool {
        let prefix = key.split(':').next().unwrap_or_default();
        match prefix {
            "quote" => self.inner.quotes.invalidate(key),
            "expirations" => self.inner.expirations.invalidate(key),
            "chain" => self.inner.chains.invalidate(key),
            _ => false,
        }
    }

    /// Drop every cached value.
    pub fn clear(&self) {
        self.inner.quotes.clear();
        self.inner.expirations.clear();
        self.inner.chains.clear();
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::application::ports::{ChainSnapshot, ContractRecord, MockMarketDataPort};

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    }

    fn call_record(strike: f64) -> ContractRecord {
        ContractRecord {
            ticker: Some(format!("O:SPY260320C{:08}", (strike * 1000.0) as u64)),
            contract_type: Some("call".to_string()),
            expiration_date: Some("2026-03-20".to_string()),
            strike_price: Some(strike),
            bid: Some(1.0),
            ask: Some(1.1),
            ..ContractRecord::default()
        }
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(MarketDataGateway::quote_key(" spy"), "quote:SPY");
        assert_eq!(MarketDataGateway::expirations_key("qqq "), "expirations:QQQ");
        assert_eq!(
            MarketDataGateway::chain_key("spy", expiry()),
            "chain:SPY:2026-03-20"
        );
    }

    #[tokio::test]
    async fn quote_symbol_is_normalized_before_provider_call() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_get_quote()
            .with(eq("SPY"))
            .times(1)
            .returning(|symbol| Ok(Quote::new(symbol, 450.0, None)));

        let gateway = MarketDataGateway::new(Arc::new(provider), GatewayConfig::default());
        assert_eq!(gateway.get_quote(" spy ").await.unwrap().price, 450.0);
        // Same key after normalization: served from cache
        assert_eq!(gateway.get_quote("SPY").await.unwrap().price, 450.0);
    }

    #[tokio::test]
    async fn chain_without_underlying_uses_quote() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_get_chain_snapshot()
            .times(1)
            .returning(|_, _| {
                Ok(ChainSnapshot {
                    underlying_price: None,
                    as_of: None,
                    records: vec![call_record(105.0), call_record(100.0)],
                })
            });
        provider
            .expect_get_quote()
            .times(1)
            .returning(|symbol| Ok(Quote::new(symbol, 101.5, None)));

        let gateway = MarketDataGateway::new(Arc::new(provider), GatewayConfig::default());
        let chain = gateway.get_chain("spy", expiry()).await.unwrap();

        assert_eq!(chain.symbol, "SPY");
        assert_eq!(chain.underlying, 101.5);
        assert_eq!(chain.calls.len(), 2);
        assert_eq!(chain.calls[0].strike, 100.0);

        // The quote fetched for the chain is cached too
        assert_eq!(gateway.get_quote("SPY").await.unwrap().price, 101.5);
    }

    #[tokio::test]
    async fn expirations_come_from_contracts() {
        let mut provider = MockMarketDataPort::new();
        provider.expect_list_contracts().times(1).returning(|_| {
            let mut later = call_record(100.0);
            later.expiration_date = Some("2026-04-17".to_string());
            Ok(vec![later, call_record(100.0), call_record(105.0)])
        });

        let gateway = MarketDataGateway::new(Arc::new(provider), GatewayConfig::default());
        let expirations = gateway.get_expirations("SPY").await.unwrap();
        assert_eq!(
            *expirations,
            vec![expiry(), NaiveDate::from_ymd_opt(2026, 4, 17).unwrap()]
        );
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let mut provider = MockMarketDataPort::new();
        provider
            .expect_get_quote()
            .times(2)
            .returning(|symbol| Ok(Quote::new(symbol, 10.0, None)));

        let gateway = MarketDataGateway::new(Arc::new(provider), GatewayConfig::default());
        gateway.get_quote("SPY").await.unwrap();
        assert!(gateway.invalidate("quote:SPY"));
        assert!(!gateway.invalidate("bogus:SPY"));
        gateway.get_quote("SPY").await.unwrap();
    }
}
