//! In-memory market data provider for tests and local development.
//!
//! Serves fixtures, counts calls per operation, and can simulate latency and
//! scripted failures.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::application::ports::{ChainSnapshot, ContractRecord, MarketDataPort, ProviderError};
use crate::domain::market_data::Quote;

/// Provider operation, for counters and scripted failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// `get_quote`.
    Quote,
    /// `list_contracts`.
    Contracts,
    /// `get_chain_snapshot`.
    ChainSnapshot,
}

#[derive(Debug, Default)]
struct Fixtures {
    quotes: HashMap<String, Quote>,
    contracts: HashMap<String, Vec<ContractRecord>>,
    snapshots: HashMap<(String, NaiveDate), ChainSnapshot>,
    failures: HashMap<ProviderOperation, VecDeque<ProviderError>>,
}

#[derive(Debug, Default)]
struct Counters {
    quote: AtomicUsize,
    contracts: AtomicUsize,
    chain_snapshot: AtomicUsize,
}

impl Counters {
    const fn get(&self, operation: ProviderOperation) -> &AtomicUsize {
        match operation {
            ProviderOperation::Quote => &self.quote,
            ProviderOperation::Contracts => &self.contracts,
            ProviderOperation::ChainSnapshot => &self.chain_snapshot,
        }
    }
}

/// Fixture-backed [`MarketDataPort`].
///
/// Unknown symbols fail with [`ProviderError::NotFound`].
#[derive(Debug, Default)]
pub struct InMemoryMarketDataProvider {
    fixtures: Mutex<Fixtures>,
    counters: Counters,
    latency: Option<Duration>,
}

impl InMemoryMarketDataProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Set the quote for a symbol.
    pub fn set_quote(&self, quote: Quote) {
        self.fixtures
            .lock()
            .quotes
            .insert(quote.symbol.clone(), quote);
    }

    /// Set the contract listing for a symbol.
    pub fn set_contracts(&self, symbol: &str, records: Vec<ContractRecord>) {
        self.fixtures
            .lock()
            .contracts
            .insert(symbol.to_string(), records);
    }

    /// Set the chain snapshot for a symbol and expiration.
    pub fn set_snapshot(&self, symbol: &str, expiration: NaiveDate, snapshot: ChainSnapshot) {
        self.fixtures
            .lock()
            .snapshots
            .insert((symbol.to_string(), expiration), snapshot);
    }

    /// Fail the next call of `operation` with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, operation: ProviderOperation, error: ProviderError) {
        self.fixtures
            .lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Calls made to `operation` so far.
    #[must_use]
    pub fn calls(&self, operation: ProviderOperation) -> usize {
        self.counters.get(operation).load(Ordering::SeqCst)
    }

    async fn begin(&self, operation: ProviderOperation) -> Result<(), ProviderError> {
        self.counters.get(operation).fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let scripted = self
            .fixtures
            .lock()
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        scripted.map_or(Ok(()), Err)
    }
}

fn not_found(symbol: &str) -> ProviderError {
    ProviderError::NotFound {
        symbol: symbol.to_string(),
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketDataProvider {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        self.begin(ProviderOperation::Quote).await?;
        self.fixtures
            .lock()
            .quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| not_found(symbol))
    }

    async fn list_contracts(&self, symbol: &str) -> Result<Vec<ContractRecord>, ProviderError> {
        self.begin(ProviderOperation::Contracts).await?;
        self.fixtures
            .lock()
            .contracts
            .get(symbol)
            .cloned()
            .ok_or_else(|| not_found(symbol))
    }

    async fn get_chain_snapshot(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<ChainSnapshot, ProviderError> {
        self.begin(ProviderOperation::ChainSnapshot).await?;
        self.fixtures
            .lock()
            .snapshots
            .get(&(symbol.to_string(), expiration))
            .cloned()
            .ok_or_else(|| not_found(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_fixtures_and_counts_calls() {
        let provider = InMemoryMarketDataProvider::new();
        provider.set_quote(Quote::new("SPY", 450.0, None));

        assert_eq!(provider.get_quote("SPY").await.unwrap().price, 450.0);
        assert_eq!(provider.get_quote("SPY").await.unwrap().price, 450.0);
        assert_eq!(provider.calls(ProviderOperation::Quote), 2);
        assert_eq!(provider.calls(ProviderOperation::Contracts), 0);
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let provider = InMemoryMarketDataProvider::new();
        let err = provider.list_contracts("ZZZZ").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NotFound {
                symbol: "ZZZZ".into()
            }
        );
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let provider = InMemoryMarketDataProvider::new();
        provider.set_quote(Quote::new("SPY", 450.0, None));
        provider.fail_next(ProviderOperation::Quote, ProviderError::Unauthorized);

        assert_eq!(
            provider.get_quote("SPY").await.unwrap_err(),
            ProviderError::Unauthorized
        );
        assert!(provider.get_quote("SPY").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let provider =
            InMemoryMarketDataProvider::new().with_latency(Duration::from_millis(500));
        provider.set_quote(Quote::new("SPY", 450.0, None));

        let started = tokio::time::Instant::now();
        provider.get_quote("SPY").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
