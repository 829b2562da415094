//! Gateway integration tests against the in-memory provider.
//!
//! Covers coalescing, cache reuse, failure handling, and chain assembly.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use futures::future::join_all;

use options_engine::application::ports::{ChainSnapshot, ContractRecord, ProviderError};
use options_engine::application::services::{GatewayConfig, MarketDataGateway};
use options_engine::domain::market_data::Quote;
use options_engine::infrastructure::marketdata::{InMemoryMarketDataProvider, ProviderOperation};

// =============================================================================
// Helpers
// =============================================================================

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

fn config() -> GatewayConfig {
    GatewayConfig {
        quote_ttl: Some(Duration::from_secs(15)),
        expirations_ttl: Some(Duration::from_secs(3600)),
        chain_ttl: Some(Duration::from_secs(60)),
        max_entries: Some(64),
    }
}

fn record(kind: &str, expiration: &str, strike: f64) -> ContractRecord {
    ContractRecord {
        contract_type: Some(kind.to_string()),
        expiration_date: Some(expiration.to_string()),
        strike_price: Some(strike),
        bid: Some(1.0),
        ask: Some(1.1),
        ..ContractRecord::default()
    }
}

fn setup(latency: Duration) -> (Arc<InMemoryMarketDataProvider>, MarketDataGateway) {
    let provider = Arc::new(InMemoryMarketDataProvider::new().with_latency(latency));
    provider.set_quote(Quote::new("SPY", 450.0, None));
    let gateway = MarketDataGateway::new(provider.clone(), config());
    (provider, gateway)
}

// =============================================================================
// Coalescing
// =============================================================================

#[tokio::test(start_paused = true)]
async fn concurrent_same_key_calls_share_one_provider_call() {
    let (provider, gateway) = setup(Duration::from_millis(200));

    let results = join_all((0..16).map(|_| gateway.get_quote("SPY"))).await;

    assert_eq!(provider.calls(ProviderOperation::Quote), 1);
    for result in results {
        assert_eq!(result.unwrap().price, 450.0);
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_error() {
    let (provider, gateway) = setup(Duration::from_millis(200));
    provider.fail_next(
        ProviderOperation::Quote,
        ProviderError::Status {
            status: 503,
            message: "unavailable".into(),
        },
    );

    let results = join_all((0..8).map(|_| gateway.get_quote("SPY"))).await;

    assert_eq!(provider.calls(ProviderOperation::Quote), 1);
    for result in results {
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::Status { status: 503, .. }
        ));
    }
}

#[tokio::test(start_paused = true)]
async fn different_keys_are_not_coalesced() {
    let (provider, gateway) = setup(Duration::from_millis(50));
    provider.set_quote(Quote::new("QQQ", 380.0, None));

    let (spy, qqq) = tokio::join!(gateway.get_quote("SPY"), gateway.get_quote("QQQ"));

    assert_eq!(spy.unwrap().price, 450.0);
    assert_eq!(qqq.unwrap().price, 380.0);
    assert_eq!(provider.calls(ProviderOperation::Quote), 2);
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn second_call_is_served_from_cache() {
    let (provider, gateway) = setup(Duration::ZERO);

    gateway.get_quote("SPY").await.unwrap();
    gateway.get_quote("spy").await.unwrap();

    assert_eq!(provider.calls(ProviderOperation::Quote), 1);
}

#[tokio::test]
async fn failure_is_not_cached() {
    let (provider, gateway) = setup(Duration::ZERO);
    provider.fail_next(ProviderOperation::Quote, ProviderError::Unauthorized);

    assert!(gateway.get_quote("SPY").await.is_err());
    assert_eq!(gateway.get_quote("SPY").await.unwrap().price, 450.0);
    assert_eq!(provider.calls(ProviderOperation::Quote), 2);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_is_refetched() {
    let (provider, gateway) = setup(Duration::ZERO);

    gateway.get_quote("SPY").await.unwrap();
    tokio::time::advance(Duration::from_secs(16)).await;
    gateway.get_quote("SPY").await.unwrap();

    assert_eq!(provider.calls(ProviderOperation::Quote), 2);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let (provider, gateway) = setup(Duration::ZERO);

    gateway.get_quote("SPY").await.unwrap();
    assert!(gateway.invalidate(&MarketDataGateway::quote_key("SPY")));
    gateway.get_quote("SPY").await.unwrap();

    assert_eq!(provider.calls(ProviderOperation::Quote), 2);
}

// =============================================================================
// Expirations and chains
// =============================================================================

#[tokio::test]
async fn expirations_are_sorted_and_deduplicated() {
    let (provider, gateway) = setup(Duration::ZERO);
    provider.set_contracts(
        "SPY",
        vec![
            record("call", "2026-04-17", 450.0),
            record("put", "2026-03-20", 440.0),
            record("call", "2026-03-20", 460.0),
            record("call", "not-a-date", 470.0),
        ],
    );

    let expirations = gateway.get_expirations("SPY").await.unwrap();

    assert_eq!(
        *expirations,
        vec![expiry(), NaiveDate::from_ymd_opt(2026, 4, 17).unwrap()]
    );
}

#[tokio::test]
async fn chain_without_underlying_uses_cached_quote() {
    let (provider, gateway) = setup(Duration::ZERO);
    let as_of = Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap();
    provider.set_snapshot(
        "SPY",
        expiry(),
        ChainSnapshot {
            underlying_price: None,
            as_of: Some(as_of),
            records: vec![
                record("call", "2026-03-20", 460.0),
                record("put", "2026-03-20", 440.0),
                record("call", "2026-03-20", 455.0),
                record("put", "2026-04-17", 430.0),
            ],
        },
    );

    gateway.get_quote("SPY").await.unwrap();
    let chain = gateway.get_chain("SPY", expiry()).await.unwrap();

    assert_eq!(chain.underlying, 450.0);
    assert_eq!(chain.as_of, as_of);
    assert_eq!(
        chain.calls.iter().map(|leg| leg.strike).collect::<Vec<_>>(),
        vec![455.0, 460.0]
    );
    assert_eq!(chain.puts.len(), 1);
    // The quote came from cache
    assert_eq!(provider.calls(ProviderOperation::Quote), 1);
}

#[tokio::test]
async fn unknown_chain_is_not_found() {
    let (_provider, gateway) = setup(Duration::ZERO);

    let err = gateway.get_chain("ZZZZ", expiry()).await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::NotFound {
            symbol: "ZZZZ".into()
        }
    );
}
